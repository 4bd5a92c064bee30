use crate::executor;
use crate::model::{
    next_order_id, DaoError, FoodOrder, Item, ItemChange, MenuQuery, OrderDraft, ProfileChange, User, PLACED_STATUS,
};
use crate::schema::{foodorder, items, itemsinorder, users};
use diesel::dsl::{max, now};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{Int4, Nullable, Text, Varchar};
use std::io::Write;
use std::result::Result;

sql_function!(fn lower(x: Text) -> Text);
sql_function!(fn btrim(x: Text) -> Text);

fn credentials_query<'a>(login: &'a str, password: &'a str) -> users::BoxedQuery<'a, Pg, Varchar> {
    users::table
        .filter(users::login.eq(login))
        .filter(users::password.eq(password))
        .select(users::login)
        .into_boxed()
}

fn menu_query(query: MenuQuery) -> items::BoxedQuery<'static, Pg> {
    let all = items::table.into_boxed();

    match query {
        MenuQuery::All => all,
        MenuQuery::ByType(kind) => all.filter(btrim(lower(items::typeofitem)).eq(kind.as_str())),
        MenuQuery::MaxPrice(limit) => all.filter(items::price.le(limit)),
        MenuQuery::PriceAscending => all.order(items::price.asc()),
        MenuQuery::PriceDescending => all.order(items::price.desc()),
    }
}

fn last_order_id_query() -> foodorder::BoxedQuery<'static, Pg, Nullable<Int4>> {
    foodorder::table.select(max(foodorder::orderid)).into_boxed()
}

/// `Some(n)` keeps the n newest orders, `None` lists them all by id.
fn orders_query(login: &str, limit: Option<i64>) -> foodorder::BoxedQuery<'_, Pg> {
    let by_user = foodorder::table.filter(foodorder::login.eq(login)).into_boxed();

    match limit {
        Some(n) => by_user.order(foodorder::ordertimestamp.desc()).limit(n),
        None => by_user.order(foodorder::orderid.asc()),
    }
}

pub struct MainDbOps<'a> {
    conn: &'a PgConnection,
}

impl<'a> MainDbOps<'a> {
    pub fn new(conn: &'a PgConnection) -> MainDbOps<'a> {
        MainDbOps { conn }
    }
}

pub trait DbOps {
    fn insert_user(
        &self,
        login: &str,
        password: &str,
        role: &str,
        phone_num: &str,
    ) -> Result<usize, diesel::result::Error>;

    fn count_credentials(&self, login: &str, password: &str) -> Result<usize, diesel::result::Error>;

    fn load_role(&self, login: &str) -> Result<Vec<Vec<String>>, diesel::result::Error>;

    fn print_profile(&self, login: &str, out: &mut dyn Write) -> Result<usize, DaoError>;

    fn update_profile(
        &self,
        login: &str,
        change: &ProfileChange,
    ) -> Result<usize, diesel::result::Error>;

    fn update_login(&self, current: &str, new_login: &str) -> Result<usize, diesel::result::Error>;

    fn update_role(&self, login: &str, role: &str) -> Result<usize, diesel::result::Error>;

    fn print_items(&self, query: MenuQuery, out: &mut dyn Write) -> Result<usize, DaoError>;

    fn print_item(&self, item_name: &str, out: &mut dyn Write) -> Result<usize, DaoError>;

    fn load_item_price(&self, item_name: &str) -> Result<Option<f64>, diesel::result::Error>;

    fn update_item(&self, item_name: &str, change: &ItemChange) -> Result<usize, diesel::result::Error>;

    /// Writes the order and its lines atomically and returns the new order id.
    fn insert_order(&self, login: &str, draft: &OrderDraft) -> Result<i32, DaoError>;

    fn load_orders(
        &self,
        login: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Vec<String>>, diesel::result::Error>;
}

impl<'a> DbOps for MainDbOps<'a> {
    fn insert_user(
        &self,
        login: &str,
        password: &str,
        role: &str,
        phone_num: &str,
    ) -> Result<usize, diesel::result::Error> {
        executor::execute(
            self.conn,
            diesel::insert_into(users::table).values((
                users::login.eq(login),
                users::password.eq(password),
                users::role.eq(role),
                users::phonenum.eq(phone_num),
            )),
        )
    }

    fn count_credentials(&self, login: &str, password: &str) -> Result<usize, diesel::result::Error> {
        executor::query_and_count::<_, String>(self.conn, credentials_query(login, password))
    }

    fn load_role(&self, login: &str) -> Result<Vec<Vec<String>>, diesel::result::Error> {
        executor::query_and_return_result::<_, String>(
            self.conn,
            users::table
                .filter(users::login.eq(login))
                .select(users::role),
        )
    }

    fn print_profile(&self, login: &str, out: &mut dyn Write) -> Result<usize, DaoError> {
        executor::query_and_print::<_, User>(self.conn, users::table.filter(users::login.eq(login)), out)
    }

    fn update_profile(
        &self,
        login: &str,
        change: &ProfileChange,
    ) -> Result<usize, diesel::result::Error> {
        let target = users::table.filter(users::login.eq(login));

        match change {
            ProfileChange::Password(v) => {
                executor::execute(self.conn, diesel::update(target).set(users::password.eq(v.as_str())))
            }
            ProfileChange::PhoneNum(v) => {
                executor::execute(self.conn, diesel::update(target).set(users::phonenum.eq(v.as_str())))
            }
            ProfileChange::FavoriteItems(v) => executor::execute(
                self.conn,
                diesel::update(target).set(users::favoriteitems.eq(v.as_str())),
            ),
        }
    }

    fn update_login(&self, current: &str, new_login: &str) -> Result<usize, diesel::result::Error> {
        executor::execute(
            self.conn,
            diesel::update(users::table.filter(users::login.eq(current))).set(users::login.eq(new_login)),
        )
    }

    fn update_role(&self, login: &str, role: &str) -> Result<usize, diesel::result::Error> {
        executor::execute(
            self.conn,
            diesel::update(users::table.filter(users::login.eq(login))).set(users::role.eq(role)),
        )
    }

    fn print_items(&self, query: MenuQuery, out: &mut dyn Write) -> Result<usize, DaoError> {
        executor::query_and_print::<_, Item>(self.conn, menu_query(query), out)
    }

    fn print_item(&self, item_name: &str, out: &mut dyn Write) -> Result<usize, DaoError> {
        executor::query_and_print::<_, Item>(
            self.conn,
            items::table.filter(items::itemname.eq(item_name)),
            out,
        )
    }

    fn load_item_price(&self, item_name: &str) -> Result<Option<f64>, diesel::result::Error> {
        items::table
            .filter(items::itemname.eq(item_name))
            .select(items::price)
            .first::<f64>(self.conn)
            .optional()
    }

    fn update_item(&self, item_name: &str, change: &ItemChange) -> Result<usize, diesel::result::Error> {
        let target = items::table.filter(items::itemname.eq(item_name));

        match change {
            ItemChange::Name(v) => {
                executor::execute(self.conn, diesel::update(target).set(items::itemname.eq(v.as_str())))
            }
            ItemChange::Ingredients(v) => {
                executor::execute(self.conn, diesel::update(target).set(items::ingredients.eq(v.as_str())))
            }
            ItemChange::TypeOfItem(v) => {
                executor::execute(self.conn, diesel::update(target).set(items::typeofitem.eq(v.as_str())))
            }
            ItemChange::Price(v) => executor::execute(self.conn, diesel::update(target).set(items::price.eq(*v))),
            ItemChange::Description(v) => {
                executor::execute(self.conn, diesel::update(target).set(items::description.eq(v.as_str())))
            }
        }
    }

    fn insert_order(&self, login: &str, draft: &OrderDraft) -> Result<i32, DaoError> {
        self.conn.transaction::<i32, DaoError, _>(|| {
            let last_id = last_order_id_query().first::<Option<i32>>(self.conn)?;
            let order_id = next_order_id(last_id)?;

            executor::execute(
                self.conn,
                diesel::insert_into(foodorder::table).values((
                    foodorder::orderid.eq(order_id),
                    foodorder::login.eq(login),
                    foodorder::storeid.eq(draft.store_id),
                    foodorder::totalprice.eq(draft.total()),
                    foodorder::ordertimestamp.eq(now),
                    foodorder::orderstatus.eq(PLACED_STATUS),
                )),
            )?;

            for line in draft.lines.iter() {
                executor::execute(
                    self.conn,
                    diesel::insert_into(itemsinorder::table).values((
                        itemsinorder::orderid.eq(order_id),
                        itemsinorder::itemname.eq(line.item_name.as_str()),
                        itemsinorder::quantity.eq(line.quantity),
                    )),
                )?;
            }

            Ok(order_id)
        })
    }

    fn load_orders(
        &self,
        login: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Vec<String>>, diesel::result::Error> {
        executor::query_and_return_result::<_, FoodOrder>(self.conn, orders_query(login, limit))
    }
}
