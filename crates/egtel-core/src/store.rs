//! Persistence contract for extracted phone records.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::phone::{Carrier, PhoneRecord};
use crate::phone::rules::{validate_national_id, validate_phone};

/// Storage for customers and their phone numbers.
pub trait PhoneStore {
    /// Whether a customer with this national ID exists.
    fn does_customer_exist(&self, national_id: &str) -> Result<bool, StoreError>;

    /// Attach a phone record to a customer.
    ///
    /// A (customer, carrier, number) triple may only be stored once.
    fn add_phone(&mut self, customer_id: &str, record: &PhoneRecord) -> Result<(), StoreError>;
}

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub national_id: String,
    pub name: String,
    pub notes: String,
}

/// A phone number stored against a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhone {
    pub phone_number: String,
    pub carrier: Carrier,
    pub has_wallet: bool,
}

/// In-memory [`PhoneStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: HashMap<String, Customer>,
    phones: HashMap<String, Vec<StoredPhone>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer.
    pub fn add_customer(
        &mut self,
        national_id: &str,
        name: &str,
        notes: &str,
    ) -> Result<(), StoreError> {
        if !validate_national_id(national_id) {
            return Err(StoreError::InvalidNationalId(national_id.to_string()));
        }
        if self.customers.contains_key(national_id) {
            return Err(StoreError::CustomerExists(national_id.to_string()));
        }

        self.customers.insert(
            national_id.to_string(),
            Customer {
                national_id: national_id.to_string(),
                name: name.to_string(),
                notes: notes.to_string(),
            },
        );
        Ok(())
    }

    /// Look up a customer.
    pub fn customer(&self, national_id: &str) -> Option<&Customer> {
        self.customers.get(national_id)
    }

    /// Phones stored for a customer.
    pub fn phones(&self, national_id: &str) -> &[StoredPhone] {
        self.phones.get(national_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl PhoneStore for MemoryStore {
    fn does_customer_exist(&self, national_id: &str) -> Result<bool, StoreError> {
        Ok(self.customers.contains_key(national_id))
    }

    fn add_phone(&mut self, customer_id: &str, record: &PhoneRecord) -> Result<(), StoreError> {
        if !self.customers.contains_key(customer_id) {
            return Err(StoreError::CustomerNotFound(customer_id.to_string()));
        }

        let phones = self.phones.entry(customer_id.to_string()).or_default();
        if phones
            .iter()
            .any(|p| p.phone_number == record.phone_number && p.carrier == record.carrier)
        {
            return Err(StoreError::Duplicate {
                customer_id: customer_id.to_string(),
                number: record.phone_number.clone(),
            });
        }

        phones.push(StoredPhone {
            phone_number: record.phone_number.clone(),
            carrier: record.carrier,
            has_wallet: record.has_wallet,
        });
        Ok(())
    }
}

/// A record that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub phone_number: String,
    pub error: StoreError,
}

/// Outcome of [`import_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Numbers stored.
    pub saved: Vec<String>,
    /// Records rejected, with the reason.
    pub failed: Vec<ImportFailure>,
}

/// Store every record for a customer, collecting per-record failures.
pub fn import_records<S: PhoneStore + ?Sized>(
    store: &mut S,
    customer_id: &str,
    records: &[PhoneRecord],
) -> ImportReport {
    let mut report = ImportReport::default();

    for record in records {
        match import_one(store, customer_id, record) {
            Ok(()) => {
                debug!("Saved {} ({}) for {}", record.phone_number, record.carrier, customer_id);
                report.saved.push(record.phone_number.clone());
            }
            Err(error) => {
                warn!("Could not save {}: {}", record.phone_number, error);
                report.failed.push(ImportFailure {
                    phone_number: record.phone_number.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "Imported {} of {} records for {}",
        report.saved.len(),
        records.len(),
        customer_id
    );
    report
}

fn import_one<S: PhoneStore + ?Sized>(
    store: &mut S,
    customer_id: &str,
    record: &PhoneRecord,
) -> Result<(), StoreError> {
    if !store.does_customer_exist(customer_id)? {
        return Err(StoreError::CustomerNotFound(customer_id.to_string()));
    }
    if !validate_phone(&record.phone_number) {
        return Err(StoreError::InvalidNumber(record.phone_number.clone()));
    }
    store.add_phone(customer_id, record)
}
