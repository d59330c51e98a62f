//! Migration: menus, posts and events with their child rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Menus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Menus::EstablishmentId).integer().not_null())
                    .col(ColumnDef::new(Menus::Name).string_len(100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menus_establishment")
                            .from(Menus::Table, Menus::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItems::MenuId).integer().not_null())
                    .col(ColumnDef::new(MenuItems::Name).string_len(100).not_null())
                    .col(ColumnDef::new(MenuItems::Description).text().null())
                    .col(ColumnDef::new(MenuItems::PriceCents).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_menu")
                            .from(MenuItems::Table, MenuItems::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posts::EstablishmentId).integer().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::Image).string().null())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_establishment")
                            .from(Posts::Table, Posts::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostLikes::PostId).integer().not_null())
                    .col(ColumnDef::new(PostLikes::UserId).integer().not_null())
                    .primary_key(Index::create().col(PostLikes::PostId).col(PostLikes::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_post")
                            .from(PostLikes::Table, PostLikes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_user")
                            .from(PostLikes::Table, PostLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::EstablishmentId).integer().not_null())
                    .col(ColumnDef::new(Events::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(
                        ColumnDef::new(Events::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_establishment")
                            .from(Events::Table, Events::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventInterestedUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventInterestedUsers::EventId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventInterestedUsers::UserId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EventInterestedUsers::EventId)
                            .col(EventInterestedUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_interested_users_event")
                            .from(EventInterestedUsers::Table, EventInterestedUsers::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_interested_users_user")
                            .from(EventInterestedUsers::Table, EventInterestedUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            EventInterestedUsers::Table.into_iden(),
            Events::Table.into_iden(),
            PostLikes::Table.into_iden(),
            Posts::Table.into_iden(),
            MenuItems::Table.into_iden(),
            Menus::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
    EstablishmentId,
    Name,
}

#[derive(Iden)]
enum MenuItems {
    Table,
    Id,
    MenuId,
    Name,
    Description,
    PriceCents,
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    EstablishmentId,
    Content,
    Image,
    CreatedAt,
}

#[derive(Iden)]
enum PostLikes {
    Table,
    PostId,
    UserId,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    EstablishmentId,
    Title,
    Description,
    StartsAt,
}

#[derive(Iden)]
enum EventInterestedUsers {
    Table,
    EventId,
    UserId,
}

#[derive(Iden)]
enum Establishments {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
