// SPDX-License-Identifier: MIT

//! The `config` module defines elements necessary for the configuration of the runtime
//! environment.

pub mod cli;
pub mod configs;
pub mod logger;
pub mod runtime;
pub mod state;
