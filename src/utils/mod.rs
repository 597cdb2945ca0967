//! Shared utilities.
//!
//! Currently just the filesystem helpers used by the render path and the
//! CLI. Everything here is deliberately small: rendering touches the
//! filesystem in exactly two ways (read a source, atomically write a
//! destination), and both live in [`fs`].

pub mod fs;
