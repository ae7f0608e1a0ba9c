pub mod random_inputs;
pub mod sensitivity;
