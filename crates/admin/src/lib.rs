//! Bude Peyek Admin library.
//!
//! This crate provides the admin functionality as a library, allowing it to
//! be tested and reused. The binary in `main.rs` wires it to a socket.
//!
//! # Architecture
//!
//! The admin panel is a thin JSON API over a hosted backend: a PostgREST
//! table store (`products`, `orders`), a GoTrue auth service, and an object
//! storage bucket for product images. It keeps a disposable in-memory copy
//! of both collections that is rebuilt wholesale after every mutation, and
//! runs the one piece of real logic in the system - the order-status /
//! stock reconciliation workflow - in [`services::orders`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
