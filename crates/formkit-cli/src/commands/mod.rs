pub mod check;
pub mod lint;
pub mod rules;
pub mod values;
pub mod view;
