//! Background tasks owned by a store. Currently only the sweeper, which
//! applies idle and age expiration on a fixed interval.

pub(crate) mod sweeper;
