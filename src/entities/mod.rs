//! Entity module - Contains the SeaORM entity definition for the catalog table.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bean;

pub use bean::{
    ActiveModel as BeanActiveModel, Column as BeanColumn, Entity as Bean, Model as BeanModel,
};
