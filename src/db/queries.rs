use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, NewBooking};

/// Millisecond precision so that back-to-back mutations of the same row get
/// distinguishable updated_at values.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn now_string() -> String {
    Utc::now().naive_utc().format(TS_FORMAT).to_string()
}

pub fn create_booking(conn: &Connection, new: &NewBooking) -> anyhow::Result<i64> {
    let now = now_string();
    conn.execute(
        "INSERT INTO bookings (service_id, service_name, amount_cents, currency, customer_name, email, date, time, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            new.service_id,
            new.service_name,
            new.amount_cents,
            new.currency,
            new.customer_name,
            new.email,
            new.date,
            new.time,
            BookingStatus::Pending.as_str(),
            now,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_booking_session(conn: &Connection, id: i64, session_id: &str) -> anyhow::Result<bool> {
    let now = now_string();
    let count = conn.execute(
        "UPDATE bookings SET session_id = ?1, updated_at = ?2 WHERE id = ?3",
        params![session_id, now, id],
    )?;
    Ok(count > 0)
}

pub fn mark_booking_paid(
    conn: &Connection,
    id: i64,
    payment_intent_id: Option<&str>,
) -> anyhow::Result<bool> {
    let now = now_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, payment_intent_id = ?2, updated_at = ?3 WHERE id = ?4",
        params![BookingStatus::Paid.as_str(), payment_intent_id, now, id],
    )?;
    Ok(count > 0)
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let now = now_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, service_id, service_name, amount_cents, currency, customer_name, email, date, time, status, session_id, payment_intent_id, created_at, updated_at
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, service_name, amount_cents, currency, customer_name, email, date, time, status, session_id, payment_intent_id, created_at, updated_at
         FROM bookings ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: i64 = row.get(0)?;
    let service_id: String = row.get(1)?;
    let service_name: String = row.get(2)?;
    let amount_cents: i64 = row.get(3)?;
    let currency: String = row.get(4)?;
    let customer_name: String = row.get(5)?;
    let email: String = row.get(6)?;
    let date: String = row.get(7)?;
    let time: String = row.get(8)?;
    let status_str: String = row.get(9)?;
    let session_id: Option<String> = row.get(10)?;
    let payment_intent_id: Option<String> = row.get(11)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TS_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TS_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        service_id,
        service_name,
        amount_cents,
        currency,
        customer_name,
        email,
        date,
        time,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        session_id,
        payment_intent_id,
        created_at,
        updated_at,
    })
}
