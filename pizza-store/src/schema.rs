table! {
    users (login) {
        login -> Varchar,
        password -> Varchar,
        role -> Varchar,
        favoriteitems -> Nullable<Varchar>,
        phonenum -> Nullable<Varchar>,
    }
}

table! {
    items (itemname) {
        itemname -> Varchar,
        ingredients -> Varchar,
        typeofitem -> Varchar,
        price -> Float8,
        description -> Nullable<Text>,
    }
}

table! {
    foodorder (orderid) {
        orderid -> Int4,
        login -> Varchar,
        storeid -> Int4,
        totalprice -> Float8,
        ordertimestamp -> Timestamp,
        orderstatus -> Varchar,
    }
}

table! {
    itemsinorder (orderid, itemname) {
        orderid -> Int4,
        itemname -> Varchar,
        quantity -> Int4,
    }
}

joinable!(foodorder -> users (login));
joinable!(itemsinorder -> foodorder (orderid));
joinable!(itemsinorder -> items (itemname));

allow_tables_to_appear_in_same_query!(
    users,
    items,
    foodorder,
    itemsinorder,
);
