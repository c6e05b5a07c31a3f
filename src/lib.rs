//! medkb - content core for a medical knowledge base.
//!
//! Loose topic JSON goes in through the [`importer`], is stored as typed
//! [`block`]s in a [`repo`], and comes out of the [`render`]er as HTML with a
//! table of contents and linked citations.

pub mod logger;

pub mod block;
pub mod cli;
pub mod config;
pub mod importer;
pub mod render;
pub mod repo;
pub mod utils;
