//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::config::{TierDiscountTable, VehicleTier};
use super::models::{PaxComposition, TierLevel};

/// Bed occupants per room when nothing else is configured.
pub const DEFAULT_PERSONS_PER_ROOM: u32 = 2;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use dmc_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Result of room allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomAllocation {
    pub rooms: u32,
    pub total_bed_occupants: u32,
    pub children_without_bed: u32,
}

/// Number of rooms needed to house a party at the default occupancy.
///
/// Children without a bed take no room capacity. At least one room is
/// always allocated, even for an empty party.
pub fn allocate_rooms(
    adults: u32,
    children_with_bed: u32,
    children_without_bed: u32,
) -> RoomAllocation {
    allocate_rooms_with(
        adults,
        children_with_bed,
        children_without_bed,
        DEFAULT_PERSONS_PER_ROOM,
    )
}

/// Room allocation with an explicit per-room occupancy
pub fn allocate_rooms_with(
    adults: u32,
    children_with_bed: u32,
    children_without_bed: u32,
    persons_per_room: u32,
) -> RoomAllocation {
    let total_bed_occupants = adults.saturating_add(children_with_bed);
    let rooms = total_bed_occupants.div_ceil(persons_per_room.max(1)).max(1);

    RoomAllocation {
        rooms,
        total_bed_occupants,
        children_without_bed,
    }
}

/// Room allocation for a pax composition
pub fn allocate_rooms_for(pax: &PaxComposition, persons_per_room: u32) -> RoomAllocation {
    allocate_rooms_with(
        pax.adults,
        pax.children_with_bed,
        pax.children_without_bed,
        persons_per_room,
    )
}

/// Pick the smallest vehicle that seats the whole party.
///
/// `tiers` must be sorted by ascending capacity. Parties larger than the
/// biggest vehicle still get the biggest vehicle. Returns `None` only for an
/// empty table.
pub fn select_vehicle(tiers: &[VehicleTier], total_pax: u32) -> Option<&VehicleTier> {
    tiers
        .iter()
        .find(|tier| total_pax <= tier.capacity)
        .or_else(|| tiers.last())
}

/// Vehicle hire for the whole package
pub fn vehicle_cost(tier: Option<&VehicleTier>, duration_days: i32) -> Decimal {
    tier.map_or(Decimal::ZERO, |t| t.price_per_day * Decimal::from(duration_days))
}

/// Total loyalty discount for a party
pub fn tier_discount(table: &TierDiscountTable, tier: Option<TierLevel>, total_pax: u32) -> Decimal {
    table.discount_for(tier) * Decimal::from(total_pax)
}
