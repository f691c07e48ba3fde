use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::{Insertable, Queryable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::product_suppliers;
use crate::schema::products;
use crate::schema::restocks;
use crate::schema::suppliers;
use crate::schema::users;

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = users)]
pub struct User{
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String
}

// What the API hands out for a user. The password column never leaves
// the db layer in any serializable type.
#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct UserRecord{
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String
}

impl From<User> for UserRecord{
    fn from(user: User) -> Self{
        UserRecord{
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role
        }
    }
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = products)]
pub struct Product{
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub category: String
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = suppliers)]
pub struct Supplier{
    pub id: Uuid,
    pub name: String,
    pub contact_info: String,
    pub payment_terms: Option<String>,
    pub lead_time_days: Option<i32>
}

#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = product_suppliers)]
pub struct ProductSupplier{
    pub product_id: Uuid,
    pub supplier_id: Uuid
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = restocks)]
pub struct Restock{
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: i32,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>
}
