#![cfg(test)]

mod classification;
mod coordinator;
mod fakes;
mod prober;
mod resolver;
mod service;
