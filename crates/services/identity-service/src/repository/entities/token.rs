//! Token database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Token;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub key: String,
    pub user_id: Uuid,
    pub issued_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Token {
    fn from(model: Model) -> Self {
        Token {
            id: model.id,
            key: model.key,
            user_id: model.user_id,
            issued_at: model.issued_at,
            expires_at: model.expires_at,
        }
    }
}

/// Convert domain entity to an insertable model
impl From<Token> for ActiveModel {
    fn from(token: Token) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(token.id),
            key: Set(token.key),
            user_id: Set(token.user_id),
            issued_at: Set(token.issued_at),
            expires_at: Set(token.expires_at),
        }
    }
}
