//! Integration-style tests driven through in-memory chain doubles.

mod test_reserves;
