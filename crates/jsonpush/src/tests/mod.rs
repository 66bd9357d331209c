mod numbers;
mod parse_good;
mod strings;
mod utils;
