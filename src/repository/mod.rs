//! Data access objects.
//!
//! Repositories issue parameterized SQL over a connection and translate
//! database failures into `AppError`. They never decide transaction boundaries.

pub mod member_repository;

pub use member_repository::MemberRepository;
