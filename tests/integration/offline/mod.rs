mod durability;
mod identity;
mod scenarios;
mod sync_policy;
