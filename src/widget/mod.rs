pub mod emitter;
pub mod movable;
pub mod pet;
