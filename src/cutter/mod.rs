pub mod cut_flow;
pub mod observables;
pub mod selector;
