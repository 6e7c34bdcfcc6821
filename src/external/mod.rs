//! Outbound HTTP plumbing shared by every remote-mode client.

pub mod client;

pub use client::HTTP_CLIENT;
