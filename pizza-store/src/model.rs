use crate::db::DbOps;
use crate::executor::{display_nullable, Record};

use chrono;
use std::error;
use std::fmt;
use std::fmt::Display;
use std::io;
use std::io::Write;
use std::result::Result;

pub const DEFAULT_ROLE: &str = "customer";
pub const MANAGER_ROLE: &str = "manager";
pub const PLACED_STATUS: &str = "Placed";
pub const RECENT_ORDERS_LIMIT: i64 = 5;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct User {
    pub login: String,
    pub password: String,
    pub role: String,
    pub favorite_items: Option<String>,
    pub phone_num: Option<String>,
}

impl Record for User {
    fn columns() -> &'static [&'static str] {
        &["login", "password", "role", "favoriteitems", "phonenum"]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.login.clone(),
            self.password.clone(),
            self.role.clone(),
            display_nullable(&self.favorite_items),
            display_nullable(&self.phone_num),
        ]
    }
}

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Item {
    pub item_name: String,
    pub ingredients: String,
    pub type_of_item: String,
    pub price: f64,
    pub description: Option<String>,
}

impl Record for Item {
    fn columns() -> &'static [&'static str] {
        &["itemname", "ingredients", "typeofitem", "price", "description"]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.item_name.clone(),
            self.ingredients.clone(),
            self.type_of_item.clone(),
            self.price.to_string(),
            display_nullable(&self.description),
        ]
    }
}

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct FoodOrder {
    pub order_id: i32,
    pub login: String,
    pub store_id: i32,
    pub total_price: f64,
    pub order_timestamp: chrono::NaiveDateTime,
    pub order_status: String,
}

impl Record for FoodOrder {
    fn columns() -> &'static [&'static str] {
        &["orderid", "login", "storeid", "totalprice", "ordertimestamp", "orderstatus"]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.order_id.to_string(),
            self.login.clone(),
            self.store_id.to_string(),
            self.total_price.to_string(),
            self.order_timestamp.to_string(),
            self.order_status.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// An order being assembled at the prompt, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub store_id: i32,
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new(store_id: i32) -> OrderDraft {
        OrderDraft {
            store_id,
            lines: vec![],
        }
    }

    /// Repeated items share one line; `ItemsInOrder` is keyed by (order, item).
    /// A merged quantity that no longer fits an `i32` is rejected and the
    /// existing line is left as it was.
    pub fn add(&mut self, item_name: &str, quantity: i32, unit_price: f64) -> Result<(), ValidateError> {
        match self.lines.iter_mut().find(|l| l.item_name == item_name) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(ValidateError::InvalidQuantityErr)?;
            }
            None => self.lines.push(OrderLine {
                item_name: item_name.to_string(),
                quantity,
                unit_price,
            }),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.unit_price * f64::from(l.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileChange {
    Password(String),
    PhoneNum(String),
    FavoriteItems(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemChange {
    Name(String),
    Ingredients(String),
    TypeOfItem(String),
    Price(f64),
    Description(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemType {
    Entree,
    Drinks,
    Sides,
}

impl ItemType {
    pub fn from_choice(choice: i32) -> Option<ItemType> {
        match choice {
            1 => Some(ItemType::Entree),
            2 => Some(ItemType::Drinks),
            3 => Some(ItemType::Sides),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            ItemType::Entree => "entree",
            ItemType::Drinks => "drinks",
            ItemType::Sides => "sides",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuQuery {
    All,
    ByType(ItemType),
    MaxPrice(f64),
    PriceAscending,
    PriceDescending,
}

#[derive(Debug, PartialEq)]
pub enum ValidateError {
    EmptyLoginErr,
    InvalidStoreIdErr,
    InvalidQuantityErr,
    InvalidPriceErr,
}

impl Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidateError::EmptyLoginErr => f.write_str("Login is empty! Please enter a username!"),
            ValidateError::InvalidStoreIdErr => f.write_str("Store ID is incorrect! It should be a whole number!"),
            ValidateError::InvalidQuantityErr => {
                f.write_str("Quantity is incorrect! Quantity should be a positive whole number!")
            }
            ValidateError::InvalidPriceErr => f.write_str("Price is incorrect! Failed to parse it!"),
        }
    }
}

impl error::Error for ValidateError {}

#[derive(Debug, PartialEq)]
pub enum DataError {
    NotLoggedInErr,
    NotAuthorizedErr,
    EmptyOrderErr,
    OrderIdExhaustedErr,
}

impl Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DataError::NotLoggedInErr => f.write_str("You are not logged in!"),
            DataError::NotAuthorizedErr => f.write_str("You are not authorized to perform this action."),
            DataError::EmptyOrderErr => f.write_str("No items were added to the order. Cancelling order."),
            DataError::OrderIdExhaustedErr => f.write_str("No order ID is left for a new order."),
        }
    }
}

impl error::Error for DataError {}

#[derive(Debug)]
pub enum DaoError {
    DieselError(diesel::result::Error),
    DataError(DataError),
    ValidateError(ValidateError),
    IoError(io::Error),
}

impl DaoError {
    pub fn is_end_of_input(&self) -> bool {
        match self {
            DaoError::IoError(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

impl Display for DaoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DaoError::DieselError(e) => f.write_str(e.to_string().as_str()),
            DaoError::DataError(e) => f.write_str(e.to_string().as_str()),
            DaoError::ValidateError(e) => f.write_str(e.to_string().as_str()),
            DaoError::IoError(e) => f.write_str(e.to_string().as_str()),
        }
    }
}

impl error::Error for DaoError {}

impl From<diesel::result::Error> for DaoError {
    fn from(err: diesel::result::Error) -> DaoError {
        DaoError::DieselError(err)
    }
}

impl From<DataError> for DaoError {
    fn from(err: DataError) -> DaoError {
        DaoError::DataError(err)
    }
}

impl From<ValidateError> for DaoError {
    fn from(err: ValidateError) -> DaoError {
        DaoError::ValidateError(err)
    }
}

impl From<io::Error> for DaoError {
    fn from(err: io::Error) -> DaoError {
        DaoError::IoError(err)
    }
}

pub fn validate_login(login: &str) -> Result<&str, ValidateError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(ValidateError::EmptyLoginErr);
    }
    Ok(login)
}

pub fn validate_store_id(input: &str) -> Result<i32, ValidateError> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidateError::InvalidStoreIdErr)
}

pub fn validate_quantity(input: &str) -> Result<i32, ValidateError> {
    match input.trim().parse::<i32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ValidateError::InvalidQuantityErr),
    }
}

pub fn validate_price(input: &str) -> Result<f64, ValidateError> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidateError::InvalidPriceErr),
    }
}

/// `done` (any case) or a blank line ends item entry.
pub fn is_end_of_order(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || input.eq_ignore_ascii_case("done")
}

pub fn create_user(
    dbops: &impl DbOps,
    login: &str,
    password: &str,
    phone_num: &str,
) -> Result<(), DaoError> {
    let login = validate_login(login)?;

    dbops.insert_user(login, password, DEFAULT_ROLE, phone_num)?;

    Ok(())
}

pub fn log_in(dbops: &impl DbOps, login: &str, password: &str) -> Result<Option<String>, DaoError> {
    let login = login.trim();
    let matches = dbops.count_credentials(login, password)?;

    if matches > 0 {
        Ok(Some(login.to_string()))
    } else {
        Ok(None)
    }
}

pub fn is_manager(dbops: &impl DbOps, login: &str) -> Result<bool, DaoError> {
    let rows = dbops.load_role(login)?;

    Ok(rows
        .first()
        .and_then(|row| row.first())
        .map(|role| role.trim().eq_ignore_ascii_case(MANAGER_ROLE))
        .unwrap_or(false))
}

pub fn verify_manager(dbops: &impl DbOps, login: &str) -> Result<(), DaoError> {
    if is_manager(dbops, login)? {
        Ok(())
    } else {
        Err(DaoError::from(DataError::NotAuthorizedErr))
    }
}

/// Id for a new order given the highest id already stored.
pub fn next_order_id(last_id: Option<i32>) -> Result<i32, DataError> {
    last_id
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(DataError::OrderIdExhaustedErr)
}

pub fn place_order(dbops: &impl DbOps, login: &str, draft: &OrderDraft) -> Result<i32, DaoError> {
    if draft.is_empty() {
        return Err(DaoError::from(DataError::EmptyOrderErr));
    }

    let order_id = dbops.insert_order(login, draft)?;
    info!("order {} placed by {} ({} line(s))", order_id, login, draft.lines.len());

    Ok(order_id)
}

/// Prints orders as labelled blocks and returns how many were printed.
pub fn print_order_history(
    dbops: &impl DbOps,
    login: &str,
    limit: Option<i64>,
    out: &mut dyn Write,
) -> Result<usize, DaoError> {
    let rows = dbops.load_orders(login, limit)?;

    if rows.is_empty() {
        writeln!(out, "You have no previous orders.")?;
        return Ok(0);
    }

    writeln!(out, "Your Order History:")?;
    for row in rows.iter() {
        write_order(row, out)?;
    }

    Ok(rows.len())
}

fn write_order(row: &[String], out: &mut dyn Write) -> io::Result<()> {
    let labels = [
        "Order ID: ",
        "User: ",
        "Store ID: ",
        "Total Price: $",
        "Order Date and Time: ",
        "Order Status: ",
    ];

    for (label, value) in labels.iter().zip(row.iter()) {
        writeln!(out, "{}{}", label, value)?;
    }
    writeln!(out, "{}", "-".repeat(50))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockDbOps;

    #[test]
    fn draft_merges_repeated_items_and_totals() {
        let mut draft = OrderDraft::new(3);
        draft.add("Pepperoni", 2, 12.5).unwrap();
        draft.add("Soda", 1, 2.0).unwrap();
        draft.add("Pepperoni", 1, 12.5).unwrap();

        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].quantity, 3);
        assert!((draft.total() - 39.5).abs() < 1e-9);
    }

    #[test]
    fn merged_quantity_overflow_is_rejected() {
        let mut draft = OrderDraft::new(1);
        draft.add("Cola", 2_000_000_000, 2.0).unwrap();

        assert_eq!(draft.add("Cola", 2_000_000_000, 2.0), Err(ValidateError::InvalidQuantityErr));
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].quantity, 2_000_000_000);
    }

    #[test]
    fn next_order_id_stops_at_i32_max() {
        assert_eq!(next_order_id(None), Ok(1));
        assert_eq!(next_order_id(Some(41)), Ok(42));
        assert_eq!(next_order_id(Some(i32::MAX)), Err(DataError::OrderIdExhaustedErr));
    }

    #[test]
    fn validators_reject_malformed_input() {
        assert_eq!(validate_store_id(" 12 "), Ok(12));
        assert_eq!(validate_store_id("twelve"), Err(ValidateError::InvalidStoreIdErr));
        assert_eq!(validate_quantity("0"), Err(ValidateError::InvalidQuantityErr));
        assert_eq!(validate_quantity("-2"), Err(ValidateError::InvalidQuantityErr));
        assert_eq!(validate_quantity("4"), Ok(4));
        assert_eq!(validate_price("9.99"), Ok(9.99));
        assert_eq!(validate_price("NaN"), Err(ValidateError::InvalidPriceErr));
        assert_eq!(validate_login("   "), Err(ValidateError::EmptyLoginErr));
    }

    #[test]
    fn end_of_order_markers() {
        assert!(is_end_of_order(""));
        assert!(is_end_of_order("  DONE "));
        assert!(!is_end_of_order("Pepperoni"));
    }

    #[test]
    fn create_user_inserts_customer() {
        let dbops = MockDbOps::default();

        create_user(&dbops, "alice", "pw", "555-0101").unwrap();

        let users = dbops.users.borrow();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, DEFAULT_ROLE);
        assert_eq!(users[0].favorite_items, None);
        assert_eq!(users[0].phone_num.as_deref(), Some("555-0101"));
    }

    #[test]
    fn log_in_requires_matching_password() {
        let dbops = MockDbOps::with_user("alice", "pw", "customer");

        assert_eq!(log_in(&dbops, "alice", "pw").unwrap(), Some(String::from("alice")));
        assert_eq!(log_in(&dbops, "alice", "nope").unwrap(), None);
        assert_eq!(log_in(&dbops, "bob", "pw").unwrap(), None);
    }

    #[test]
    fn log_in_trims_login_like_create_user() {
        let dbops = MockDbOps::default();
        create_user(&dbops, " alice", "pw", "555-0101").unwrap();

        assert_eq!(log_in(&dbops, " alice ", "pw").unwrap(), Some(String::from("alice")));
    }

    #[test]
    fn manager_role_is_trimmed_and_case_insensitive() {
        let dbops = MockDbOps::with_user("boss", "pw", " Manager  ");
        dbops.add_user("alice", "pw", "customer");

        assert!(is_manager(&dbops, "boss").unwrap());
        assert!(!is_manager(&dbops, "alice").unwrap());
        assert!(!is_manager(&dbops, "ghost").unwrap());
        match verify_manager(&dbops, "alice") {
            Err(DaoError::DataError(DataError::NotAuthorizedErr)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_order_is_not_written() {
        let dbops = MockDbOps::with_user("alice", "pw", "customer");

        match place_order(&dbops, "alice", &OrderDraft::new(1)) {
            Err(DaoError::DataError(DataError::EmptyOrderErr)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(dbops.orders.borrow().is_empty());
    }

    #[test]
    fn order_ids_follow_the_highest_existing_id() {
        let dbops = MockDbOps::with_user("alice", "pw", "customer");
        let mut draft = OrderDraft::new(1);
        draft.add("Pepperoni", 1, 10.0).unwrap();

        assert_eq!(place_order(&dbops, "alice", &draft).unwrap(), 1);
        assert_eq!(place_order(&dbops, "alice", &draft).unwrap(), 2);
    }

    #[test]
    fn order_history_prints_labelled_blocks() {
        let dbops = MockDbOps::with_user("alice", "pw", "customer");
        let mut draft = OrderDraft::new(4);
        draft.add("Pepperoni", 2, 10.0).unwrap();
        place_order(&dbops, "alice", &draft).unwrap();

        let mut out = Vec::new();
        let printed = print_order_history(&dbops, "alice", None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(printed, 1);
        assert!(text.starts_with("Your Order History:\n"));
        assert!(text.contains("Order ID: 1\n"));
        assert!(text.contains("Store ID: 4\n"));
        assert!(text.contains("Total Price: $20\n"));
        assert!(text.contains("Order Status: Placed\n"));
    }

    #[test]
    fn empty_order_history_says_so() {
        let dbops = MockDbOps::with_user("alice", "pw", "customer");

        let mut out = Vec::new();
        assert_eq!(print_order_history(&dbops, "alice", Some(5), &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "You have no previous orders.\n");
    }
}
