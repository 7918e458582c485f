pub mod access;
pub mod catalog;
pub mod health;
pub mod inheritance;
pub mod permissions;

#[cfg(test)]
mod test_support;
