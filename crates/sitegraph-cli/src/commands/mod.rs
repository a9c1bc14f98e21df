pub mod check;
pub mod error;
pub mod exec;
pub mod infer;
pub mod site;

#[cfg(test)]
mod exec_tests;
#[cfg(test)]
mod infer_tests;
#[cfg(test)]
mod site_tests;
