//! User repository.
//!
//! Registration, admin account management, the soft-delete toggle and the
//! admin point-adjustment entry point. Every operation that changes more
//! than one row (registration bonuses, referral bonuses) runs inside a
//! single write guard.

use chrono::Utc;
use rand::Rng;

use levelup_core::{Email, Points, ReferralCode, Role, UserId};

use super::{Db, RepositoryError, Tables, ledger};
use crate::models::{Address, LedgerSource, User};

/// Points granted to every new registration.
pub const REGISTRATION_BONUS_POINTS: i64 = 100;

/// Points granted to both sides of a matched referral.
pub const REFERRAL_BONUS_POINTS: i64 = 50;

/// Attempts at drawing an unused referral-code suffix before giving up.
const MAX_REFERRAL_CODE_ATTEMPTS: usize = 64;

/// Input for self-service registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Argon2id hash, never the plaintext password.
    pub password_hash: String,
    pub rut: String,
    pub age: u8,
    pub address: Address,
    /// Referral code the user typed, already parsed. Unknown codes are
    /// ignored; registration still succeeds without the bonus.
    pub referred_by: Option<ReferralCode>,
}

/// Input for admin-side account creation.
#[derive(Debug, Clone)]
pub struct AdminNewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub rut: String,
    pub age: u8,
    pub address: Option<Address>,
}

/// Partial update applied by an admin. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub rut: Option<String>,
    pub age: Option<u8>,
    pub role: Option<Role>,
    pub address: Option<Address>,
    pub password_hash: Option<String>,
}

/// Partial self-service profile update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub address: Option<Address>,
    pub password_hash: Option<String>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Db,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Register a new customer account.
    ///
    /// Grants the registration bonus, and when `referred_by` matches an
    /// existing account's referral code, grants the referral bonus to both
    /// sides. All of it commits in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank or the
    /// address is incomplete.
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub fn register(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();

        if new.name.trim().is_empty() {
            return Err(RepositoryError::Validation("name is required".to_owned()));
        }
        if !new.address.is_complete() {
            return Err(RepositoryError::Validation(
                "address requires street, city and region".to_owned(),
            ));
        }
        ensure_email_available(&tables, &new.email, None)?;

        let referral_code = allocate_referral_code(&tables, &new.name)?;
        let referrer_id = new
            .referred_by
            .as_ref()
            .and_then(|code| tables.users.iter().find(|u| &u.referral_code == code))
            .map(|u| u.id);

        let id = UserId::generate();
        let now = Utc::now();
        let user = User {
            id,
            name: new.name,
            has_duoc_discount: new.email.qualifies_for_duoc_discount(),
            email: new.email,
            rut: new.rut,
            age: new.age,
            role: Role::Customer,
            points: Points::ZERO,
            referral_code,
            referred_by: referrer_id.and(new.referred_by),
            address: new.address,
            is_active: true,
            password_hash: new.password_hash,
            created_at: now,
        };
        tables.users.insert(id.as_uuid(), user);

        ledger::apply_points(
            &mut tables,
            id,
            REGISTRATION_BONUS_POINTS,
            LedgerSource::RegistrationBonus,
            now,
        )?;
        if let Some(referrer) = referrer_id {
            let source = LedgerSource::ReferralBonus {
                referrer,
                referred: id,
            };
            ledger::apply_points(
                &mut tables,
                referrer,
                REFERRAL_BONUS_POINTS,
                source.clone(),
                now,
            )?;
            ledger::apply_points(&mut tables, id, REFERRAL_BONUS_POINTS, source, now)?;
        }

        tables
            .users
            .get(id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Create an account from the admin panel.
    ///
    /// Admin-created accounts start at zero points and take part in no
    /// referral; the address defaults to a placeholder when omitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank.
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub fn create_by_admin(&self, new: AdminNewUser) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();

        if new.name.trim().is_empty() {
            return Err(RepositoryError::Validation("name is required".to_owned()));
        }
        ensure_email_available(&tables, &new.email, None)?;

        let referral_code = allocate_referral_code(&tables, &new.name)?;
        let id = UserId::generate();
        let user = User {
            id,
            name: new.name,
            has_duoc_discount: new.email.qualifies_for_duoc_discount(),
            email: new.email,
            rut: new.rut,
            age: new.age,
            role: new.role,
            points: Points::ZERO,
            referral_code,
            referred_by: None,
            address: new.address.unwrap_or_else(placeholder_address),
            is_active: true,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id.as_uuid(), user.clone());

        Ok(user)
    }

    /// List every account in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<User> {
        self.db.read().users.iter().cloned().collect()
    }

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    pub fn get_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        self.db
            .read()
            .users
            .get(id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Find an account by login identifier: email (case-insensitive) or
    /// exact display name.
    #[must_use]
    pub fn find_by_login_identifier(&self, identifier: &str) -> Option<User> {
        self.db
            .read()
            .users
            .iter()
            .find(|u| u.email.matches(identifier) || u.name == identifier)
            .cloned()
    }

    /// Apply an admin update. `None` fields keep their current value; a
    /// short replacement password has already been filtered out by the
    /// caller, so `password_hash` is only ever a valid hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    /// Returns `RepositoryError::Forbidden` when changing the primary
    /// admin's role.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub fn update_by_admin(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();

        let current = tables
            .users
            .get(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(role) = patch.role
            && role != current.role
            && tables.primary_admin == Some(id)
        {
            return Err(RepositoryError::Forbidden(
                "the primary admin's role cannot be changed".to_owned(),
            ));
        }
        if let Some(email) = &patch.email {
            ensure_email_available(&tables, email, Some(id))?;
        }

        let user = tables
            .users
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;
        if let Some(email) = patch.email {
            user.has_duoc_discount = email.qualifies_for_duoc_discount();
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(rut) = patch.rut {
            user.rut = rut;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(address) = patch.address {
            user.address = address;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }

        Ok(user.clone())
    }

    /// Apply a self-service profile update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    pub fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();
        let user = tables
            .users
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }
        if let Some(address) = patch.address {
            user.address = address;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }

        Ok(user.clone())
    }

    /// Activate or deactivate an account (soft delete).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    /// Returns `RepositoryError::Forbidden` when deactivating the primary
    /// admin.
    pub fn set_active(&self, id: UserId, is_active: bool) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();

        if !is_active && tables.primary_admin == Some(id) {
            return Err(RepositoryError::Forbidden(
                "the primary admin cannot be deactivated".to_owned(),
            ));
        }

        let user = tables
            .users
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;
        user.is_active = is_active;

        Ok(user.clone())
    }

    /// Adjust an account's point balance from the admin panel.
    ///
    /// A zero delta succeeds trivially and writes no ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    /// Returns `RepositoryError::InsufficientPoints` if the delta would take
    /// the balance below zero; the balance is left untouched.
    pub fn adjust_points(&self, id: UserId, delta: i64) -> Result<User, RepositoryError> {
        let mut tables = self.db.write();
        ledger::apply_points(
            &mut tables,
            id,
            delta,
            LedgerSource::AdminAdjustment,
            Utc::now(),
        )?;

        tables
            .users
            .get(id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Remove an account permanently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    /// Returns `RepositoryError::Forbidden` for the primary admin.
    pub fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write();

        if tables.primary_admin == Some(id) {
            return Err(RepositoryError::Forbidden(
                "the primary admin cannot be deleted".to_owned(),
            ));
        }
        tables
            .users
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Pick a referral code not yet taken by any account.
fn allocate_referral_code(
    tables: &Tables,
    name: &str,
) -> Result<ReferralCode, RepositoryError> {
    let mut rng = rand::rng();
    for _ in 0..MAX_REFERRAL_CODE_ATTEMPTS {
        let code = ReferralCode::from_name(name, rng.random_range(0..9_000));
        if !tables.users.iter().any(|u| u.referral_code == code) {
            return Ok(code);
        }
    }

    Err(RepositoryError::Conflict(
        "could not allocate a unique referral code".to_owned(),
    ))
}

/// Check the unique-email constraint, skipping `except` (the account being
/// updated).
fn ensure_email_available(
    tables: &Tables,
    email: &Email,
    except: Option<UserId>,
) -> Result<(), RepositoryError> {
    let taken = tables
        .users
        .iter()
        .any(|u| Some(u.id) != except && u.email.matches(email.as_str()));
    if taken {
        return Err(RepositoryError::Conflict("email already exists".to_owned()));
    }

    Ok(())
}

fn placeholder_address() -> Address {
    Address {
        street: "N/A".to_owned(),
        city: "N/A".to_owned(),
        region: "N/A".to_owned(),
        zip_code: Some("N/A".to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_address() -> Address {
        Address {
            street: "Calle Falsa 123".to_owned(),
            city: "Santiago".to_owned(),
            region: "Metropolitana".to_owned(),
            zip_code: None,
        }
    }

    pub(crate) fn new_user_fixture(email: &str) -> NewUser {
        NewUser {
            name: "Lucas Soto".to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$test-hash".to_owned(),
            rut: "12.345.678-5".to_owned(),
            age: 21,
            address: test_address(),
            referred_by: None,
        }
    }

    /// Insert a bare user row with the given balance, bypassing the
    /// registration bonus. For exercising single operations in isolation.
    pub(crate) fn insert_test_user(db: &Db, email: &str, points: i64) -> UserId {
        let id = UserId::generate();
        let mut tables = db.write();
        let referral_code = allocate_referral_code(&tables, email).unwrap();
        tables.users.insert(
            id.as_uuid(),
            User {
                id,
                name: email.to_owned(),
                email: Email::parse(email).unwrap(),
                rut: String::new(),
                age: 20,
                role: Role::Customer,
                points: Points::new(points).unwrap(),
                referral_code,
                referred_by: None,
                has_duoc_discount: false,
                address: test_address(),
                is_active: true,
                password_hash: "$argon2id$test-hash".to_owned(),
                created_at: Utc::now(),
            },
        );
        id
    }

    #[test]
    fn test_register_grants_base_bonus() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let user = repo.register(new_user_fixture("lucas@gmail.com")).unwrap();
        assert_eq!(user.points.as_i64(), REGISTRATION_BONUS_POINTS);
        assert_eq!(user.role, Role::Customer);
        assert!(user.is_active);
        assert!(!user.has_duoc_discount);
        assert_eq!(user.referred_by, None);
        assert_eq!(db.read().ledger.len(), 1);
    }

    #[test]
    fn test_register_derives_duoc_discount() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let user = repo.register(new_user_fixture("lucas@duocuc.cl")).unwrap();
        assert!(user.has_duoc_discount);

        let user = repo
            .register(new_user_fixture("ana@DUOCUC.CL"))
            .unwrap();
        assert!(user.has_duoc_discount);
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        repo.register(new_user_fixture("lucas@gmail.com")).unwrap();
        let err = repo
            .register(new_user_fixture("LUCAS@GMAIL.COM"))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn test_register_rejects_incomplete_address() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let mut new = new_user_fixture("lucas@gmail.com");
        new.address.city = "  ".to_owned();
        let err = repo.register(new).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(db.read().users.len(), 0);
    }

    #[test]
    fn test_register_rejects_blank_name() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let mut new = new_user_fixture("lucas@gmail.com");
        new.name = " ".to_owned();
        assert!(matches!(
            repo.register(new),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_referral_bonus_credits_both_sides() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let referrer = repo.register(new_user_fixture("ana@gmail.com")).unwrap();

        let mut new = new_user_fixture("lucas@gmail.com");
        new.referred_by = Some(referrer.referral_code.clone());
        let referred = repo.register(new).unwrap();

        assert_eq!(
            referred.points.as_i64(),
            REGISTRATION_BONUS_POINTS + REFERRAL_BONUS_POINTS
        );
        assert_eq!(referred.referred_by, Some(referrer.referral_code.clone()));
        let referrer_after = repo.get_by_id(referrer.id).unwrap();
        assert_eq!(
            referrer_after.points.as_i64(),
            REGISTRATION_BONUS_POINTS + REFERRAL_BONUS_POINTS
        );
        // Four entries: two registrations, one referral bonus per side.
        assert_eq!(db.read().ledger.len(), 4);
    }

    #[test]
    fn test_unknown_referral_code_is_ignored() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let mut new = new_user_fixture("lucas@gmail.com");
        new.referred_by = Some(ReferralCode::parse("NADIE9999").unwrap());
        let user = repo.register(new).unwrap();

        assert_eq!(user.points.as_i64(), REGISTRATION_BONUS_POINTS);
        assert_eq!(user.referred_by, None);
    }

    #[test]
    fn test_referral_codes_are_unique() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let a = repo.register(new_user_fixture("ana1@gmail.com")).unwrap();
        let mut new = new_user_fixture("ana2@gmail.com");
        new.name = a.name.clone();
        let b = repo.register(new).unwrap();
        assert_ne!(a.referral_code, b.referral_code);
    }

    #[test]
    fn test_adjust_points_roundtrip() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 500);

        let after_credit = repo.adjust_points(id, 100).unwrap();
        assert_eq!(after_credit.points.as_i64(), 600);
        let after_debit = repo.adjust_points(id, -100).unwrap();
        assert_eq!(after_debit.points.as_i64(), 500);
    }

    #[test]
    fn test_adjust_points_zero_delta_succeeds() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 500);

        let user = repo.adjust_points(id, 0).unwrap();
        assert_eq!(user.points.as_i64(), 500);
        assert_eq!(db.read().ledger.len(), 0);
    }

    #[test]
    fn test_find_by_login_identifier() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let user = repo.register(new_user_fixture("lucas@gmail.com")).unwrap();

        assert_eq!(
            repo.find_by_login_identifier("LUCAS@gmail.com").unwrap().id,
            user.id
        );
        assert_eq!(
            repo.find_by_login_identifier("Lucas Soto").unwrap().id,
            user.id
        );
        assert!(repo.find_by_login_identifier("lucas soto").is_none());
        assert!(repo.find_by_login_identifier("nadie@gmail.com").is_none());
    }

    #[test]
    fn test_create_by_admin_starts_at_zero_points() {
        let db = Db::new();
        let repo = UserRepository::new(&db);

        let user = repo
            .create_by_admin(AdminNewUser {
                name: "Vendedor Uno".to_owned(),
                email: Email::parse("vendedor@levelup.com").unwrap(),
                password_hash: "$argon2id$test-hash".to_owned(),
                role: Role::Seller,
                rut: String::new(),
                age: 0,
                address: None,
            })
            .unwrap();

        assert_eq!(user.role, Role::Seller);
        assert!(user.points.is_zero());
        assert_eq!(db.read().ledger.len(), 0);
    }

    #[test]
    fn test_update_by_admin_merges_fields() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 100);

        let updated = repo
            .update_by_admin(
                id,
                UserPatch {
                    name: Some("Lucas A. Soto".to_owned()),
                    age: Some(22),
                    ..UserPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Lucas A. Soto");
        assert_eq!(updated.age, 22);
        // Untouched fields survive.
        assert_eq!(updated.email.as_str(), "lucas@gmail.com");
        assert_eq!(updated.points.as_i64(), 100);
    }

    #[test]
    fn test_update_by_admin_recomputes_duoc_flag_on_email_change() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 0);

        let updated = repo
            .update_by_admin(
                id,
                UserPatch {
                    email: Some(Email::parse("lucas@duocuc.cl").unwrap()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert!(updated.has_duoc_discount);
    }

    #[test]
    fn test_update_by_admin_rejects_taken_email() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        insert_test_user(&db, "ana@gmail.com", 0);
        let id = insert_test_user(&db, "lucas@gmail.com", 0);

        let err = repo
            .update_by_admin(
                id,
                UserPatch {
                    email: Some(Email::parse("ana@gmail.com").unwrap()),
                    ..UserPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Keeping your own email is no conflict.
        repo.update_by_admin(
            id,
            UserPatch {
                email: Some(Email::parse("lucas@gmail.com").unwrap()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn test_primary_admin_role_is_locked() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "admin@levelup.com", 0);
        {
            let mut tables = db.write();
            tables.users.get_mut(id.as_uuid()).unwrap().role = Role::Admin;
            tables.primary_admin = Some(id);
        }

        let err = repo
            .update_by_admin(
                id,
                UserPatch {
                    role: Some(Role::Customer),
                    ..UserPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Forbidden(_)));
        assert_eq!(repo.get_by_id(id).unwrap().role, Role::Admin);

        // Restating the current role is a no-op, not a violation.
        repo.update_by_admin(
            id,
            UserPatch {
                role: Some(Role::Admin),
                ..UserPatch::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn test_primary_admin_cannot_be_deactivated_or_deleted() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "admin@levelup.com", 0);
        db.write().primary_admin = Some(id);

        assert!(matches!(
            repo.set_active(id, false),
            Err(RepositoryError::Forbidden(_))
        ));
        assert!(matches!(
            repo.delete(id),
            Err(RepositoryError::Forbidden(_))
        ));
        assert!(repo.get_by_id(id).unwrap().is_active);
    }

    #[test]
    fn test_set_active_toggles_soft_delete() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 0);

        assert!(!repo.set_active(id, false).unwrap().is_active);
        assert!(repo.set_active(id, true).unwrap().is_active);
    }

    #[test]
    fn test_delete_removes_the_row() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 0);

        repo.delete(id).unwrap();
        assert!(matches!(
            repo.get_by_id(id),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(repo.delete(id), Err(RepositoryError::NotFound)));
    }

    #[test]
    fn test_update_profile_keeps_unpatched_fields() {
        let db = Db::new();
        let repo = UserRepository::new(&db);
        let id = insert_test_user(&db, "lucas@gmail.com", 100);

        let updated = repo
            .update_profile(
                id,
                ProfilePatch {
                    name: Some("Lucas Soto Pérez".to_owned()),
                    password_hash: Some("$argon2id$new-hash".to_owned()),
                    ..ProfilePatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Lucas Soto Pérez");
        assert_eq!(updated.password_hash, "$argon2id$new-hash");
        assert_eq!(updated.age, 20);
    }
}
