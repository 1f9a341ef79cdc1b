use hrdesk_core::{hash_password, verify_password};

#[test]
fn test_hash_and_verify() {
    let hash = hash_password("Admin@123").unwrap();
    assert_ne!(hash, "Admin@123");
    assert!(verify_password("Admin@123", &hash).unwrap());
    assert!(!verify_password("wrong", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
}
