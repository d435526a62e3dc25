//! Token inspection across local tokenizers, with paired delimiters
//! highlighted in each model's token preview.

pub mod app;
pub mod engine;
pub mod input;
pub mod tokenize;
pub mod ui;
