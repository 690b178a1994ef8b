//! Dragonroll API - Backend for a tabletop-RPG session manager
//!
//! This crate provides the REST API for Dragonroll, enabling:
//! - User registration and character creation
//! - Game tables run by a game master
//! - Join requests binding a character to a game
//! - Versioned adventure records

pub mod abilities;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
