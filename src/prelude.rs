pub use crate::{
    axes::{axis::*, point::*},
    extrapolation::enums::*,
    interpolation::{combine::*, evaluate, evaluate_with, interpolant::*},
    utils::{errors::*, num::*},
};
