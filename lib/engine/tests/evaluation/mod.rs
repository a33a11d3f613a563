#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

mod bgp;
mod index;
mod operators;
mod paths;
mod service;
mod sub_query;
mod test_utils;
