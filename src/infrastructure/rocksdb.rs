use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::PaymentStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing payment records.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for bookkeeping such as the id sequence.
pub const CF_META: &str = "meta";

const SEQUENCE_KEY: &[u8] = b"payment_seq";

/// A persistent payment store backed by RocksDB.
///
/// Payments are stored as JSON under their big-endian id. Because the state
/// survives process restarts, a payment pre-authorized by one run can be
/// authorized by a later one.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    sequence_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("payments" and "meta") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn next_id(&self) -> Result<PaymentId> {
        let _guard = self.sequence_lock.lock().await;
        let cf = self.cf(CF_META)?;

        let current = match self.db.get_cf(cf, SEQUENCE_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    PaymentError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "corrupt payment sequence",
                    )))
                })?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };

        let next = current + 1;
        self.db.put_cf(cf, SEQUENCE_KEY, next.to_be_bytes())?;
        Ok(PaymentId(next))
    }

    async fn save(&self, payment: Payment) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        let value = serde_json::to_vec(&payment)?;
        self.db.put_cf(cf, payment.id.0.to_be_bytes(), value)?;
        Ok(())
    }

    async fn load(&self, id: PaymentId) -> Result<Option<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;

        let mut payments = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            payments.push(serde_json::from_slice(&value)?);
        }

        Ok(payments)
    }
}
