mod common;
mod letters;
