//! End-to-end tests of the hostsieve pipeline over temporary directories.

#[cfg(test)]
mod pipeline;
