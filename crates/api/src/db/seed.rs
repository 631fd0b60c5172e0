//! Startup seed data.
//!
//! The store is empty on every boot. Seeding installs the one account every
//! deployment needs (the primary admin, credentials from configuration) and
//! the base reward catalog, then records the admin id so the account
//! protections in the user store know which account to guard.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;

use levelup_core::{
    Email, EmailError, Points, PointsError, ReferralCode, ReferralCodeError, RewardId, RewardKind,
    Role, UserId,
};

use super::{Db, Tables};
use crate::models::{Address, Reward, User};
use crate::services::auth::{self, AuthError};

/// Points the primary admin starts with.
const ADMIN_STARTING_POINTS: i64 = 100_000;

/// Fixed referral code for the primary admin.
const ADMIN_REFERRAL_CODE: &str = "ADMIN1000";

/// Errors that can occur while seeding the store.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The configured admin email does not parse.
    #[error("invalid admin email: {0}")]
    AdminEmail(#[from] EmailError),

    /// The admin referral code does not parse.
    #[error("invalid admin referral code: {0}")]
    AdminReferralCode(#[from] ReferralCodeError),

    /// The admin starting balance is invalid.
    #[error("invalid admin starting balance: {0}")]
    AdminPoints(#[from] PointsError),

    /// Hashing the admin password failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Install the primary admin and the base reward catalog.
///
/// Does nothing if a primary admin is already recorded, so callers may run
/// it unconditionally at startup.
///
/// # Errors
///
/// Returns a [`SeedError`] if the configured admin email does not parse or
/// the password cannot be hashed.
pub fn install(db: &Db, admin_email: &str, admin_password: &SecretString) -> Result<(), SeedError> {
    let email = Email::parse(admin_email)?;
    let password_hash = auth::hash_password(admin_password.expose_secret())?;
    let referral_code = ReferralCode::parse(ADMIN_REFERRAL_CODE)?;
    let points = Points::new(ADMIN_STARTING_POINTS)?;

    let mut tables = db.write();
    if tables.primary_admin.is_some() {
        return Ok(());
    }

    let admin_id = UserId::generate();
    let admin = User {
        id: admin_id,
        name: "Administrador Principal".to_owned(),
        has_duoc_discount: email.qualifies_for_duoc_discount(),
        email,
        rut: "1-9".to_owned(),
        age: 30,
        role: Role::Admin,
        // The starting balance predates the ledger; history reconciles from
        // here, not from zero.
        points,
        referral_code,
        referred_by: None,
        address: Address {
            street: "Av. Siempre Viva 742".to_owned(),
            city: "Springfield".to_owned(),
            region: "Metropolitana".to_owned(),
            zip_code: Some("1234567".to_owned()),
        },
        is_active: true,
        password_hash,
        created_at: Utc::now(),
    };
    tables.users.insert(admin_id.as_uuid(), admin);
    tables.primary_admin = Some(admin_id);

    install_rewards(&mut tables);

    info!(rewards = tables.rewards.len(), "Store seeded");
    Ok(())
}

fn install_rewards(tables: &mut Tables) {
    let catalog = [
        reward(
            "Taza Gamer Edición Limitada",
            RewardKind::Product,
            2_800,
            "Canjea tus puntos por una taza exclusiva de Level-Up.",
            "Standard",
            "/images/taza-gamer.png",
        ),
        reward(
            "Cupón de $5.000 CLP",
            RewardKind::Discount,
            6_000,
            "Descuento aplicable a tu próxima compra.",
            "Standard",
            "/images/cupon.png",
        ),
        reward(
            "Mousepad RGB Extendido",
            RewardKind::Product,
            18_000,
            "Mousepad amplio con iluminación RGB.",
            "Standard",
            "/images/mousepad-razer-chroma.png",
        ),
        reward(
            "Envío Express Gratuito",
            RewardKind::Shipping,
            3_500,
            "Cubre el costo de tu envío express (Valor: $5.000 CLP).",
            "Standard",
            "/images/truck.png",
        ),
        reward(
            "Polera Gamer Level-Up",
            RewardKind::Product,
            15_000,
            "Polera con diseño del logo de la tienda.",
            "Standard",
            "/images/polera-gamer-personalizada.png",
        ),
        reward(
            "Cupón de 15% OFF",
            RewardKind::Discount,
            35_000,
            "Descuento del 15% para una compra grande.",
            "Standard",
            "/images/descuento.png",
        ),
        reward(
            "Cupón 20% OFF HALLOWEEN",
            RewardKind::Discount,
            8_000,
            "Cupón especial de temporada: 20% OFF.",
            "Halloween",
            "/images/halloween.png",
        ),
    ];

    for item in catalog {
        tables.rewards.insert(item.id.as_uuid(), item);
    }
}

fn reward(
    name: &str,
    kind: RewardKind,
    points_cost: i64,
    description: &str,
    season: &str,
    image_url: &str,
) -> Reward {
    Reward {
        id: RewardId::generate(),
        name: name.to_owned(),
        kind,
        points_cost,
        description: description.to_owned(),
        is_active: true,
        season: season.to_owned(),
        image_url: image_url.to_owned(),
    }
}
