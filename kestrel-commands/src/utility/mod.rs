pub mod about;
pub mod clear;
pub mod help;
pub mod pages;
