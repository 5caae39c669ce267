// file: src/utils/mod.rs
// description: utility module exports
// reference: Internal module structure

pub mod logging;
