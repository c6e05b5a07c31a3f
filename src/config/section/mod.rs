//! Configuration section definitions.
//!
//! Each module corresponds to a section in `medkb.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `site`   | `[site]`     | Site name, public URL, admin URL pattern |
//! | `store`  | `[store]`    | Content store snapshot location          |
//! | `import` | `[import]`   | Topic import behavior                    |
//! | `build`  | `[build]`    | Static HTML output                       |
//!
//! `[render]` deserializes straight into [`crate::render::RenderOptions`].

mod build;
mod import;
mod site;
mod store;

pub use build::BuildConfig;
pub use import::ImportConfig;
pub use site::SiteConfig;
pub use store::StoreConfig;
