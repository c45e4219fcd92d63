//! Demo dataset: one claimed sports bar with a day of bookings plus a few
//! unclaimed venues to search for.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use cuefinder_core::errors::{DeskError, DeskResult};
use cuefinder_core::models::booking::{Booking, BookingStatus, DEFAULT_GRACE_PERIOD_MINUTES};
use cuefinder_core::models::range::DateRange;
use cuefinder_core::models::table::{MaintenanceStatus, Table, TableSize, TableStatus, TableType};
use cuefinder_core::models::user::{User, UserRole};
use cuefinder_core::models::venue::{Venue, VerificationStatus};
use eyre::Result;
use rust_decimal::Decimal;
use tracing::info;

use crate::auth::{hash_password, Credential};
use crate::memory::MemoryStore;
use crate::models::{DbBooking, DbTable, DbUser, DbVenue};
use crate::repositories::{booking, credential, table, user, venue};
use crate::DbPool;

pub const DEMO_VENUE_ID: &str = "demo-venue-001";
pub const DEMO_USER_ID: &str = "demo-user-001";
pub const DEMO_EMAIL: &str = "demo@cuefinder.app";
pub const DEMO_PASSWORD: &str = "cuefinder-demo";
pub const DEMO_TIMEZONE: &str = "America/Los_Angeles";

/// Days of completed history generated before today.
const HISTORY_DAYS: i64 = 6;

#[derive(Debug, Clone)]
pub struct DemoData {
    pub owner: User,
    pub venues: Vec<Venue>,
    pub tables: Vec<Table>,
    pub bookings: Vec<Booking>,
}

fn money(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

fn venue(id: &str, name: &str, address: &str, venue_type: &str, table_count: u32) -> Venue {
    Venue {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: None,
        email: None,
        website: None,
        venue_type: venue_type.to_string(),
        table_count,
        price_per_hour: None,
        booking_enabled: false,
        is_active: true,
        owner_id: None,
        owner_email: None,
        claimed_at: None,
        verification_status: None,
        timezone: DEMO_TIMEZONE.to_string(),
    }
}

fn demo_table(
    n: u32,
    number: &str,
    size: TableSize,
    table_type: TableType,
    rate: i64,
    location: &str,
) -> Table {
    Table {
        id: format!("table-{}", n),
        venue_id: DEMO_VENUE_ID.to_string(),
        number: number.to_string(),
        size,
        table_type,
        hourly_rate: money(rate),
        is_active: true,
        maintenance_status: MaintenanceStatus::Good,
        status: TableStatus::Available,
        current_booking_id: None,
        features: Vec::new(),
        location: Some(location.to_string()),
    }
}

struct Slot<'a> {
    id: String,
    tables: &'a [&'a str],
    start: DateTime<Utc>,
    minutes: i64,
    party_size: u32,
    status: BookingStatus,
    cost: i64,
    customer: &'a str,
}

fn demo_booking(slot: Slot<'_>, created_at: DateTime<Utc>) -> Booking {
    let code: String = slot
        .id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_uppercase();
    Booking {
        confirmation_code: format!("CF-{}", code),
        venue_id: DEMO_VENUE_ID.to_string(),
        user_id: format!("guest-{}", slot.id),
        table_ids: slot.tables.iter().map(|t| t.to_string()).collect(),
        start_time: slot.start,
        end_time: slot.start + Duration::minutes(slot.minutes),
        party_size: slot.party_size,
        status: slot.status,
        total_cost: money(slot.cost),
        deposit_amount: None,
        notes: None,
        special_requests: Vec::new(),
        customer_name: Some(slot.customer.to_string()),
        customer_phone: None,
        customer_email: None,
        cancellation_reason: None,
        no_show_fee: None,
        actual_start_time: (slot.status == BookingStatus::InProgress).then_some(slot.start),
        grace_period_minutes: DEFAULT_GRACE_PERIOD_MINUTES,
        created_at,
        updated_at: created_at,
        id: slot.id,
    }
}

/// Builds the dataset around `now`, with today's bookings laid out on the
/// venue's local clock.
pub fn dataset(now: DateTime<Utc>) -> DeskResult<DemoData> {
    let tz = Tz::from_str(DEMO_TIMEZONE)
        .map_err(|e| DeskError::Validation(format!("Unknown timezone {}: {}", DEMO_TIMEZONE, e)))?;
    let today = now.with_timezone(&tz).date_naive();
    let midnight = DateRange::for_day(today, tz)?.start;
    let at = |hours: i64| midnight + Duration::hours(hours);

    let owner = User {
        id: DEMO_USER_ID.to_string(),
        email: DEMO_EMAIL.to_string(),
        display_name: "Demo Venue Owner".to_string(),
        role: UserRole::VenueOwner,
        owned_venue_ids: vec![DEMO_VENUE_ID.to_string()],
        created_at: now,
    };

    let mut flatstick = venue(
        DEMO_VENUE_ID,
        "Flatstick Pub - Pioneer Square",
        "240 2nd Ave S, Seattle, WA 98104",
        "sports_bar",
        12,
    );
    flatstick.phone = Some("(206) 652-0359".to_string());
    flatstick.website = Some("https://flatstickpub.com".to_string());
    flatstick.price_per_hour = Some(money(35));
    flatstick.booking_enabled = true;
    flatstick.owner_id = Some(DEMO_USER_ID.to_string());
    flatstick.owner_email = Some(DEMO_EMAIL.to_string());
    flatstick.claimed_at = Some(now - Duration::days(30));
    flatstick.verification_status = Some(VerificationStatus::Verified);

    let venues = vec![
        flatstick,
        venue("venue-rack-em", "Rack'em Billiards", "1100 Pike St, Seattle, WA 98101", "pool_hall", 16),
        venue("venue-corner-pocket", "Corner Pocket Lounge", "415 E Pine St, Seattle, WA 98122", "bar", 4),
        venue("venue-eight-ball", "Eight Ball Social Club", "5300 Ballard Ave NW, Seattle, WA 98107", "pool_hall", 10),
        venue("venue-cue-room", "The Cue Room", "820 Pacific Ave, Tacoma, WA 98402", "pool_hall", 8),
    ];

    use TableSize::*;
    use TableType::*;
    let mut tables = vec![
        demo_table(1, "1", EightFoot, Standard, 35, "Main Floor"),
        demo_table(2, "2", EightFoot, Standard, 35, "Main Floor"),
        demo_table(3, "3", NineFoot, Tournament, 45, "Main Floor"),
        demo_table(4, "4", EightFoot, Standard, 35, "Main Floor"),
        demo_table(5, "5", SevenFoot, BarBox, 30, "Bar Area"),
        demo_table(6, "6", SevenFoot, BarBox, 30, "Bar Area"),
        demo_table(7, "7", EightFoot, Standard, 35, "Back Room"),
        demo_table(8, "8", EightFoot, Standard, 35, "Back Room"),
        demo_table(9, "VIP-1", NineFoot, Tournament, 55, "VIP Room"),
        demo_table(10, "VIP-2", NineFoot, Tournament, 55, "VIP Room"),
        demo_table(11, "11", EightFoot, Standard, 35, "Main Floor"),
        demo_table(12, "12", EightFoot, Standard, 35, "Main Floor"),
    ];
    tables[3].maintenance_status = MaintenanceStatus::Fair;
    tables[5].is_active = false;
    tables[5].maintenance_status = MaintenanceStatus::UnderMaintenance;
    tables[5].status = TableStatus::Maintenance;
    tables[4].status = TableStatus::Occupied;
    tables[4].current_booking_id = Some("booking-3".to_string());

    let slots = vec![
        Slot { id: "booking-1".into(), tables: &["table-1"], start: at(10), minutes: 120, party_size: 4, status: BookingStatus::Completed, cost: 70, customer: "John Smith" },
        Slot { id: "booking-2".into(), tables: &["table-3", "table-4"], start: at(11), minutes: 120, party_size: 8, status: BookingStatus::Completed, cost: 160, customer: "Sarah Johnson" },
        Slot { id: "booking-3".into(), tables: &["table-5"], start: now - Duration::hours(1), minutes: 120, party_size: 3, status: BookingStatus::InProgress, cost: 60, customer: "Mike Chen" },
        Slot { id: "booking-4".into(), tables: &["table-7", "table-8"], start: now + Duration::hours(1), minutes: 120, party_size: 6, status: BookingStatus::Confirmed, cost: 140, customer: "Emily Davis" },
        Slot { id: "booking-5".into(), tables: &["table-9"], start: now + Duration::hours(2), minutes: 120, party_size: 4, status: BookingStatus::Confirmed, cost: 110, customer: "Alex Thompson" },
        Slot { id: "booking-6".into(), tables: &["table-2"], start: now + Duration::hours(3), minutes: 120, party_size: 2, status: BookingStatus::Pending, cost: 70, customer: "David Wilson" },
        Slot { id: "booking-7".into(), tables: &["table-11", "table-12"], start: now + Duration::hours(4), minutes: 180, party_size: 10, status: BookingStatus::Confirmed, cost: 210, customer: "Corporate Events LLC" },
    ];
    let mut bookings: Vec<Booking> = slots
        .into_iter()
        .map(|slot| demo_booking(slot, now - Duration::days(2)))
        .collect();

    // A week of settled evenings so the analytics views have history.
    let regulars = ["Jordan Lee", "Priya Patel", "Sam Rivera"];
    for day in 1..=HISTORY_DAYS {
        let evening = at(18) - Duration::days(day);
        for (i, customer) in regulars.iter().enumerate() {
            let offset = i64::try_from(i).unwrap_or(0);
            let table_ids: &[&str] = match i {
                0 => &["table-1"],
                1 => &["table-3"],
                _ => &["table-7", "table-8"],
            };
            let status = if (day + offset) % 5 == 0 {
                BookingStatus::NoShow
            } else {
                BookingStatus::Completed
            };
            bookings.push(demo_booking(
                Slot {
                    id: format!("history-{}-{}", day, i + 1),
                    tables: table_ids,
                    start: evening + Duration::hours(offset),
                    minutes: 90 + 30 * offset,
                    party_size: 2 + 2 * u32::try_from(i).unwrap_or(0),
                    status,
                    cost: 50 + 20 * day + 15 * offset,
                    customer,
                },
                evening - Duration::days(1),
            ));
        }
    }

    Ok(DemoData {
        owner,
        venues,
        tables,
        bookings,
    })
}

pub fn load_into_memory(store: &MemoryStore, data: &DemoData) -> Result<()> {
    store.insert_user(data.owner.clone());
    store.insert_credential(Credential {
        user_id: data.owner.id.clone(),
        email: data.owner.email.clone(),
        password_hash: hash_password(DEMO_PASSWORD)?,
    });
    for venue in &data.venues {
        store.insert_venue(venue.clone());
    }
    for table in &data.tables {
        store.insert_table(table.clone());
    }
    for booking in &data.bookings {
        store.insert_booking(booking.clone());
    }

    info!(
        "Loaded demo data: {} venues, {} tables, {} bookings",
        data.venues.len(),
        data.tables.len(),
        data.bookings.len()
    );
    Ok(())
}

/// Writes the dataset to Postgres. Safe to run repeatedly.
pub async fn load_into_postgres(pool: &DbPool, data: &DemoData) -> Result<()> {
    user::upsert_user(
        pool,
        &DbUser {
            id: data.owner.id.clone(),
            email: data.owner.email.clone(),
            display_name: data.owner.display_name.clone(),
            role: data.owner.role.as_str().to_string(),
            owned_venue_ids: data.owner.owned_venue_ids.clone(),
            created_at: data.owner.created_at,
        },
    )
    .await?;
    credential::create_credential(
        pool,
        &data.owner.email,
        &data.owner.id,
        &hash_password(DEMO_PASSWORD)?,
    )
    .await?;

    for entry in &data.venues {
        venue::upsert_venue(pool, &DbVenue::from(entry)).await?;
    }
    for entry in &data.tables {
        table::upsert_table(pool, &DbTable::from(entry)).await?;
    }
    for entry in &data.bookings {
        booking::upsert_booking(pool, &DbBooking::from(entry)).await?;
    }

    info!(
        "Seeded demo data: {} venues, {} tables, {} bookings",
        data.venues.len(),
        data.tables.len(),
        data.bookings.len()
    );
    Ok(())
}
