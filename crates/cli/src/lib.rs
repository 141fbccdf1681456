//! Command-line front end for [`coursegrab`].

pub mod cli;
pub mod logging;
pub mod output;
pub mod run;
pub mod shutdown;
pub mod workspace;
