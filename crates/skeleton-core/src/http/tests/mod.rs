#[cfg(test)]
mod routes_tests;
