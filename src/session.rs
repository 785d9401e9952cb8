//! In-memory, per-session data bags.

//! The session framework (rouille's session cookie support) only
//! hands out an id; the bags themselves live here. Ids are never used
//! as raw map keys: they are run through a keyed hasher first, so a
//! debugger or log dump of the store can't be replayed as cookies.

use std::collections::HashMap;
use std::sync::Mutex;

use blake3::Hasher;
use kstring::KString;
use serde_json::{Map, Value};

use crate::util::now_unixtime;

pub fn sessionid_hash(mut hasher: Hasher, session_id: &str) -> KString {
    hasher.update(session_id.as_bytes());
    KString::from_string(hasher.finalize().to_hex().to_string())
}

#[derive(Debug)]
struct SessionEntry {
    data: Map<String, Value>,
    last_request_time: i64,
}

/// Holds every live session's data bag. Expiry is lazy: entries past
/// the TTL are dropped when the store is next written to.
pub struct SessionStore {
    // Keyed with a process-local secret; cheap to clone per lookup.
    sessionid_hasher: Hasher,
    ttl_seconds: i64,
    sessions: Mutex<HashMap<KString, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl_seconds: u32) -> Result<SessionStore, getrandom::Error> {
        let mut secret = [0u8; 32];
        getrandom::getrandom(&mut secret)?;
        Ok(SessionStore {
            sessionid_hasher: Hasher::new_keyed(&secret),
            ttl_seconds: ttl_seconds as i64,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    fn hashed(&self, session_id: &str) -> KString {
        sessionid_hash(self.sessionid_hasher.clone(), session_id)
    }

    fn expired(&self, entry: &SessionEntry, now: i64) -> bool {
        now - entry.last_request_time > self.ttl_seconds
    }

    /// The data bag for this session; an empty mapping if there is
    /// none (yet) or it has expired.
    pub fn load(&self, session_id: &str) -> Map<String, Value> {
        self.load_at(session_id, now_unixtime())
    }

    pub fn load_at(&self, session_id: &str, now: i64) -> Map<String, Value> {
        let key = self.hashed(session_id);
        let mut sessions = self.sessions.lock().expect("die too if poisoned");
        match sessions.get(&key) {
            Some(entry) if ! self.expired(entry, now) => entry.data.clone(),
            Some(_) => {
                sessions.remove(&key);
                Map::new()
            }
            None => Map::new(),
        }
    }

    /// Persist the bag back, refreshing the entry's timestamp. Also
    /// drops whatever other entries have expired meanwhile.
    pub fn store(&self, session_id: &str, data: Map<String, Value>) {
        self.store_at(session_id, data, now_unixtime())
    }

    pub fn store_at(&self, session_id: &str, data: Map<String, Value>, now: i64) {
        let key = self.hashed(session_id);
        let mut sessions = self.sessions.lock().expect("die too if poisoned");
        sessions.retain(|_, entry| ! self.expired(entry, now));
        sessions.insert(key, SessionEntry { data, last_request_time: now });
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("die too if poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
