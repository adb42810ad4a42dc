//! egui rendering: side/top panels and the central bar chart.

pub mod panels;
pub mod plot;
