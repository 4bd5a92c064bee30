use crate::console::Console;
use crate::db::DbOps;
use crate::menu::{Flow, Menu};
use crate::model::*;

use std::io;

pub struct Session<D: DbOps> {
    pub dbops: D,
    pub user: Option<String>,
}

impl<D: DbOps> Session<D> {
    pub fn new(dbops: D) -> Session<D> {
        Session { dbops, user: None }
    }

    pub fn current_user(&self) -> Result<String, DaoError> {
        self.user
            .clone()
            .ok_or_else(|| DaoError::from(DataError::NotLoggedInErr))
    }
}

pub fn main_menu<D: DbOps>() -> Menu<Session<D>> {
    Menu::new("MAIN MENU")
        .entry(1, "Create user", create_user::<D>)
        .entry(2, "Log in", log_in::<D>)
        .entry(9, "< EXIT", exit::<D>)
}

pub fn user_menu<D: DbOps>() -> Menu<Session<D>> {
    Menu::new("USER MENU")
        .entry(1, "View Profile", view_profile::<D>)
        .entry(2, "Update Profile", update_profile::<D>)
        .entry(3, "View Menu", view_menu::<D>)
        .entry(4, "Place Order", place_order::<D>)
        .entry(5, "View Full Order ID History", view_all_orders::<D>)
        .entry(6, "View Past 5 Order IDs", view_recent_orders::<D>)
        .entry(7, "View Order Information", not_available::<D>)
        .entry(8, "View Stores", not_available::<D>)
        .entry(9, "Update Order Status", not_available::<D>)
        .entry(10, "Update Menu", update_menu::<D>)
        .entry(11, "Update User", update_user::<D>)
        .rule()
        .entry(20, "Log out", exit::<D>)
}

fn exit<D: DbOps>(_: &mut Session<D>, _: &mut Console) -> Result<Flow, DaoError> {
    Ok(Flow::Exit)
}

fn not_available<D: DbOps>(_: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    console.say("This option is not available yet.")?;
    Ok(Flow::Continue)
}

/// Shows a numbered list of options and reads one choice.
fn select(console: &mut Console, title: &str, options: &[&str]) -> io::Result<i32> {
    console.say(title)?;
    for (i, option) in options.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, option))?;
    }
    console.read_choice()
}

fn report_update(console: &mut Console, affected: usize, success: &str) -> io::Result<()> {
    if affected > 0 {
        console.say(success)
    } else {
        console.say("No matching record was found, nothing was updated.")
    }
}

fn create_user<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = console.prompt("Create Username: ")?;
    let password = console.prompt("Create Password: ")?;
    let phone_num = console.prompt("Enter your phone number: ")?;

    crate::model::create_user(&session.dbops, &login, &password, &phone_num)?;
    console.say("User created successfully!")?;

    Ok(Flow::Continue)
}

fn log_in<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = console.prompt("Enter your username: ")?;
    let password = console.prompt("Enter your password: ")?;

    let user = match crate::model::log_in(&session.dbops, &login, &password)? {
        Some(v) => v,
        None => {
            console.say("Invalid login!")?;
            return Ok(Flow::Continue);
        }
    };

    console.say(&format!("Login Successful! Welcome {}", user))?;
    info!("{} logged in", user);

    session.user = Some(user);
    let result = user_menu::<D>().run(session, console);
    session.user = None;
    result?;

    Ok(Flow::Continue)
}

fn view_profile<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;
    session.dbops.print_profile(&login, console.out())?;
    Ok(Flow::Continue)
}

fn update_profile<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;

    let choice = select(
        console,
        "Update Profile Menu",
        &["Change Password", "Change Phone Number", "Change Favorite Item", "Exit"],
    )?;

    let (change, success) = match choice {
        1 => (
            ProfileChange::Password(console.prompt("Enter your new password: ")?),
            "Password changed successfully!",
        ),
        2 => (
            ProfileChange::PhoneNum(console.prompt("Enter your new phone number: ")?),
            "Phone number changed successfully!",
        ),
        3 => (
            ProfileChange::FavoriteItems(
                console.prompt("Enter your new favorite items (separate by comma): ")?,
            ),
            "Favorite items changed successfully!",
        ),
        4 => {
            console.say("Returning to main menu...")?;
            return Ok(Flow::Continue);
        }
        _ => {
            console.say("Invalid choice! Please choose again")?;
            return Ok(Flow::Continue);
        }
    };

    let affected = session.dbops.update_profile(&login, &change)?;
    report_update(console, affected, success)?;

    Ok(Flow::Continue)
}

fn view_menu<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let choice = select(
        console,
        "View Menu",
        &[
            "View all items",
            "Filter items by type",
            "Filter items by price",
            "Sort items by price (lowest to highest)",
            "Sort items by price (highest to lowest)",
            "Exit",
        ],
    )?;

    let query = match choice {
        1 => MenuQuery::All,
        2 => {
            let kind = select(console, "Choose Item type", &["Entrees", "Drinks", "Sides"])?;
            match ItemType::from_choice(kind) {
                Some(v) => MenuQuery::ByType(v),
                None => {
                    console.say("Invalid choice! Please choose again")?;
                    return Ok(Flow::Continue);
                }
            }
        }
        3 => MenuQuery::MaxPrice(validate_price(&console.prompt("Enter the maximum price: ")?)?),
        4 => MenuQuery::PriceAscending,
        5 => MenuQuery::PriceDescending,
        6 => {
            console.say("Returning to main menu...")?;
            return Ok(Flow::Continue);
        }
        _ => {
            console.say("Invalid choice! Please choose again")?;
            return Ok(Flow::Continue);
        }
    };

    session.dbops.print_items(query, console.out())?;

    Ok(Flow::Continue)
}

fn place_order<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;

    let store_id =
        validate_store_id(&console.prompt("Enter the store ID where you want to place your order: ")?)?;
    let mut draft = OrderDraft::new(store_id);

    loop {
        let item_name = console.prompt("Enter item name or hit enter to finish: ")?;
        if is_end_of_order(&item_name) {
            break;
        }
        let item_name = item_name.trim();

        let unit_price = match session.dbops.load_item_price(item_name)? {
            Some(v) => v,
            None => {
                console.say("Item not found! Please enter a valid item name.")?;
                continue;
            }
        };

        let quantity = match validate_quantity(&console.prompt("Enter quantity: ")?) {
            Ok(v) => v,
            Err(e) => {
                console.say(&e.to_string())?;
                continue;
            }
        };

        if let Err(e) = draft.add(item_name, quantity, unit_price) {
            console.say(&e.to_string())?;
        }
    }

    let order_id = match crate::model::place_order(&session.dbops, &login, &draft) {
        Ok(v) => v,
        Err(DaoError::DataError(DataError::EmptyOrderErr)) => {
            console.say(&DataError::EmptyOrderErr.to_string())?;
            return Ok(Flow::Continue);
        }
        Err(e) => return Err(e),
    };

    console.say(&format!("Order placed successfully! Order ID: {}", order_id))?;
    console.say(&format!("Total Price: ${:.2}", draft.total()))?;

    Ok(Flow::Continue)
}

fn view_all_orders<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;
    print_order_history(&session.dbops, &login, None, console.out())?;
    Ok(Flow::Continue)
}

fn view_recent_orders<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;
    print_order_history(&session.dbops, &login, Some(RECENT_ORDERS_LIMIT), console.out())?;
    Ok(Flow::Continue)
}

fn update_menu<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;
    verify_manager(&session.dbops, &login)?;

    let item_name = console.prompt("Enter the item name to update: ")?;
    let item_name = item_name.trim();
    if session.dbops.print_item(item_name, console.out())? == 0 {
        console.say("Item not found!")?;
        return Ok(Flow::Continue);
    }

    let choice = select(
        console,
        "Choose item information to update",
        &["Item Name", "Ingredients", "Item Type", "Price", "Description", "Exit"],
    )?;

    let change = match choice {
        1 => ItemChange::Name(console.prompt("Enter new item name: ")?),
        2 => ItemChange::Ingredients(console.prompt("Enter new ingredients: ")?),
        3 => ItemChange::TypeOfItem(console.prompt("Enter new item type: ")?),
        4 => ItemChange::Price(validate_price(&console.prompt("Enter new price: ")?)?),
        5 => ItemChange::Description(console.prompt("Enter new description: ")?),
        6 => {
            console.say("Returning to main menu...")?;
            return Ok(Flow::Continue);
        }
        _ => {
            console.say("Invalid choice! Please choose again")?;
            return Ok(Flow::Continue);
        }
    };

    let success = match &change {
        ItemChange::Name(v) => format!("Item name successfully updated to '{}'", v),
        ItemChange::Ingredients(v) => format!("Item ingredients successfully updated to '{}'", v),
        ItemChange::TypeOfItem(v) => format!("Item type successfully updated to '{}'", v),
        ItemChange::Price(v) => format!("Item price successfully updated to '{}'", v),
        ItemChange::Description(v) => format!("Item description successfully updated to '{}'", v),
    };

    let affected = session.dbops.update_item(item_name, &change)?;
    report_update(console, affected, &success)?;

    Ok(Flow::Continue)
}

fn update_user<D: DbOps>(session: &mut Session<D>, console: &mut Console) -> Result<Flow, DaoError> {
    let login = session.current_user()?;
    verify_manager(&session.dbops, &login)?;

    let choice = select(
        console,
        "Manager Update Profile",
        &["Update user login", "Update user role", "Exit"],
    )?;

    match choice {
        1 => {
            let current = console.prompt("Enter the current login of the user to update: ")?.trim().to_string();
            let new_login = validate_login(&console.prompt("Enter the new login: ")?)?.to_string();

            let affected = session.dbops.update_login(&current, &new_login)?;
            if affected > 0 && current == login {
                session.user = Some(new_login.clone());
            }
            report_update(
                console,
                affected,
                &format!("User login updated successfully from '{}' to '{}'", current, new_login),
            )?;
        }
        2 => {
            let target = console.prompt("Enter the current login of the user to update the role: ")?.trim().to_string();
            let role = console.prompt("Enter the new role: ")?;

            let affected = session.dbops.update_role(&target, &role)?;
            report_update(
                console,
                affected,
                &format!("User role updated successfully to '{}'", role),
            )?;
        }
        3 => console.say("Returning to main menu...")?,
        _ => console.say("Invalid choice! Please choose again")?,
    }

    Ok(Flow::Continue)
}
