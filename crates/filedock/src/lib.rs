//! filedock: catalog files against a database, copy them between trees and
//! attach images to them.
//!
//! The engines live in [`catalog`]; they reach the database and the disk
//! only through the traits in [`storage`]. [`config`] resolves where the
//! database, the trees and the images live.

pub mod catalog;
pub mod config;
pub mod storage;
