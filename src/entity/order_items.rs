use sea_orm::entity::prelude::*;

/// One ordered product. `price` is the unit price captured at checkout,
/// `quantity` is pieces or grams depending on the product's sale type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_delete = "Cascade"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

/// Line item -> product -> store that sells it.
pub struct SellingStore;

impl Linked for SellingStore {
    type FromEntity = Entity;
    type ToEntity = super::stores::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            Relation::Products.def(),
            super::products::Relation::Stores.def(),
        ]
    }
}

impl ActiveModelBehavior for ActiveModel {}
