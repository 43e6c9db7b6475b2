//! Runs the customer store through a short connect/insert/find/delete session.
//!
//! Configuration comes from `CUSTOMER_STORE_*` environment variables; see
//! [`StoreConfig::from_env`]. Every failure is already printed and logged by
//! the store, so the session carries on past it.

use customer_store::{CustomerStore, StoreConfig};

fn main() {
    let mut store = CustomerStore::new(StoreConfig::from_env());

    let _ = store.connect();
    let _ = store.disconnect();

    // Rejected without a connection.
    let _ = store.create_table();

    let _ = store.connect();
    let _ = store.create_table();
    let _ = store.insert_customer("John", "python", "11111111111", "john@gmail.com");
    let _ = store.insert_customer("Durant", "javascript", "22222222222", "durant@gmail.com");
    let _ = store.find_by_cpf("11111111111");
    let _ = store.delete_by_cpf("22222222222");
    let _ = store.find_by_email("durant@gmail.com");
    let _ = store.find_by_cpf("11111111111");
    let _ = store.disconnect();
}
