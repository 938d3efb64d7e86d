/// Core game model: grid, actions, entities, chase AI and collisions.
/// Nothing in here touches the terminal or the configuration.

pub mod action;
pub mod ai;
pub mod collision;
pub mod entity;
pub mod grid;
