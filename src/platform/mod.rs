// Seams to the outside world: where poses come from and where actions go

pub mod input;
pub mod pose;
