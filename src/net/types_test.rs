use super::*;
use serde_json::json;

fn user(role: Option<&str>) -> User {
    User {
        id: "1".into(),
        email: "a@example.test".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        picture: None,
        role: role.map(str::to_owned),
        created_at: None,
    }
}

// =============================================================
// User
// =============================================================

#[test]
fn user_decodes_camel_case_profile() {
    let raw = json!({
        "id": "u1",
        "email": "ada@example.test",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "picture": "https://img.example/ada.png",
        "role": "admin",
        "createdAt": "2025-03-15T00:00:00Z"
    });
    let user: User = serde_json::from_value(raw).unwrap();
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.picture.as_deref(), Some("https://img.example/ada.png"));
    assert_eq!(user.created_at.as_deref(), Some("2025-03-15T00:00:00Z"));
    assert!(user.is_admin());
}

#[test]
fn user_decodes_minimal_profile() {
    let user: User = serde_json::from_value(json!({ "id": "1", "role": "user" })).unwrap();
    assert_eq!(user.email, "");
    assert!(!user.is_admin());
}

#[test]
fn user_without_role_is_not_admin() {
    assert!(!user(None).is_admin());
}

#[test]
fn role_match_is_exact() {
    assert!(!user(Some("Admin")).is_admin());
    assert!(!user(Some("administrator")).is_admin());
    assert!(user(Some("admin")).is_admin());
}

#[test]
fn display_name_falls_back_to_email() {
    assert_eq!(user(None).display_name(), "Ada Lovelace");
    let mut anon = user(None);
    anon.first_name.clear();
    anon.last_name.clear();
    assert_eq!(anon.display_name(), "a@example.test");
}

#[test]
fn user_patch_skips_absent_fields() {
    let patch = UserPatch { role: Some("admin".into()), ..UserPatch::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "role": "admin" }));
}

// =============================================================
// Cards / decks
// =============================================================

#[test]
fn user_card_keeps_unknown_fields() {
    let raw = json!({ "id": "c1", "multiverseId": "409574", "name": "Forest", "setCode": "KLD" });
    let card: UserCard = serde_json::from_value(raw).unwrap();
    assert_eq!(card.multiverse_id.as_deref(), Some("409574"));
    assert_eq!(card.details.get("setCode"), Some(&json!("KLD")));
}

#[test]
fn numeric_card_ids_decode_as_text() {
    let raw = json!({ "cards": [{ "id": 7, "multiverseId": 409_574, "name": "Forest" }] });
    let resp: UserCardsResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(resp.cards[0].id, "7");
    assert_eq!(resp.cards[0].multiverse_id.as_deref(), Some("409574"));
    assert!(resp.cards[0].details.is_empty());
}

#[test]
fn null_multiverse_id_is_absent() {
    let card: UserCard = serde_json::from_value(json!({ "id": "c1", "multiverseId": null })).unwrap();
    assert_eq!(card.multiverse_id, None);
}

#[test]
fn numeric_user_and_deck_ids_decode_as_text() {
    let user: User = serde_json::from_value(json!({ "id": 12, "role": "admin" })).unwrap();
    assert_eq!(user.id, "12");
    let deck: Deck = serde_json::from_value(json!({ "id": 3, "name": "Elves", "userId": 12 })).unwrap();
    assert_eq!((deck.id.as_str(), deck.user_id.as_str()), ("3", "12"));
}

#[test]
fn user_cards_response_defaults_to_empty() {
    let resp: UserCardsResponse = serde_json::from_value(json!({})).unwrap();
    assert!(resp.cards.is_empty());
}

#[test]
fn add_card_request_uses_camel_case() {
    let body = AddCardRequest { multiverse_id: "42" };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "multiverseId": "42" }));
}

#[test]
fn deck_response_with_error() {
    let resp: DeckResponse = serde_json::from_value(json!({ "error": "Deck not found" })).unwrap();
    assert!(resp.deck.is_none());
    assert_eq!(resp.error.as_deref(), Some("Deck not found"));
}

#[test]
fn deck_decodes_with_defaults() {
    let deck: Deck = serde_json::from_value(json!({ "id": "d1", "name": "Mono Green" })).unwrap();
    assert_eq!(deck.description, "");
    assert!(deck.cards.is_empty());
}

#[test]
fn new_deck_omits_missing_description() {
    let body = NewDeck { name: "Burn".into(), description: None };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "name": "Burn" }));
}

#[test]
fn usernames_page_decodes() {
    let page: UsernamesPage =
        serde_json::from_value(json!({ "usernames": ["ada", "bob"], "page": 2, "totalPages": 3, "total": 25 }))
            .unwrap();
    assert_eq!(page.usernames, vec!["ada", "bob"]);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn token_response_missing_token() {
    let resp: TokenResponse = serde_json::from_value(json!({ "message": "no" })).unwrap();
    assert!(resp.token.is_none());
}
