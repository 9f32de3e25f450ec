use hotel_booking_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let admin_id = ensure_user(&pool, "admin@hotel.local", "admin12345", "Quản trị viên", "admin").await?;
    let staff_id = ensure_user(&pool, "staff@hotel.local", "staff12345", "Nhân viên buồng phòng", "staff").await?;
    seed_room_types_and_rooms(&pool).await?;
    seed_services(&pool).await?;
    seed_inventories(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Staff ID: {staff_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_room_types_and_rooms(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (name, capacity, max guests, price per night, extra bed allowed, extra bed price, floor, rooms)
    let room_types = [
        ("Standard", 2, 2, 800_000_i64, false, 0_i64, 1, 4),
        ("Superior", 2, 3, 1_200_000, true, 300_000, 2, 3),
        ("Deluxe", 3, 4, 1_800_000, true, 400_000, 3, 3),
        ("Family Suite", 4, 5, 2_800_000, true, 500_000, 4, 2),
    ];

    for (name, capacity, max_guest, price, extra_bed_allowed, extra_bed_price, floor, count) in
        room_types
    {
        let (type_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO room_types
                (id, name, capacity, max_guest, price_per_night, extra_bed_allowed, extra_bed_price, amenities)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO UPDATE SET price_per_night = EXCLUDED.price_per_night
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(capacity)
        .bind(max_guest)
        .bind(price)
        .bind(extra_bed_allowed)
        .bind(extra_bed_price)
        .bind(serde_json::json!(["Wi-Fi", "Điều hòa", "TV"]))
        .fetch_one(pool)
        .await?;

        for index in 1..=count {
            sqlx::query(
                r#"
                INSERT INTO rooms (id, room_number, floor, type_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (room_number) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(format!("{floor}{index:02}"))
            .bind(floor)
            .bind(type_id)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded room types and rooms");
    Ok(())
}

async fn seed_services(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let services = [
        ("Bữa sáng buffet", 150_000_i64, "person", "người", "food"),
        ("Đưa đón sân bay", 350_000, "trip", "chuyến", "transport"),
        ("Giặt ủi", 50_000, "kg", "kg", "laundry"),
        ("Spa thư giãn", 500_000, "session", "lần", "spa"),
        ("Phòng nghỉ", 0, "night", "đêm", "room"),
    ];

    for (name, price, unit, unit_display, category) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, name, price, unit, unit_display, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .bind(unit)
        .bind(unit_display)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded services");
    Ok(())
}

async fn seed_inventories(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let items = [
        ("Khăn tắm", "LINEN", "REUSABLE", 120, 40, "cái"),
        ("Ga trải giường", "LINEN", "REUSABLE", 60, 20, "bộ"),
        ("Dầu gội", "TOILETRY", "CONSUMABLE", 200, 50, "chai"),
        ("Nước lau sàn", "CLEANING", "CONSUMABLE", 10, 10, "can"),
        ("Nước suối", "MINIBAR", "CONSUMABLE", 300, 100, "chai"),
    ];

    for (name, category, item_type, quantity, min_quantity, unit) in items {
        sqlx::query(
            r#"
            INSERT INTO inventories (id, name, category, item_type, quantity, min_quantity, unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(item_type)
        .bind(quantity)
        .bind(min_quantity)
        .bind(unit)
        .execute(pool)
        .await?;
    }

    println!("Seeded inventories");
    Ok(())
}
