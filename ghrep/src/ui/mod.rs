// ghrep/src/ui/mod.rs
//! Terminal output: coloured messages, tables and the colour theme.

pub mod output_format;
pub mod table;
pub mod theme;
