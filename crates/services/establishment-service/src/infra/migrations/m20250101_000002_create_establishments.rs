//! Migration: establishments and the rows created or linked with them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Establishments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Establishments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Establishments::Auth0Id)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Establishments::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Establishments::Description).text().null())
                    .col(ColumnDef::new(Establishments::City).string_len(100).not_null())
                    .col(ColumnDef::new(Establishments::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Establishments::Latitude).double().null())
                    .col(ColumnDef::new(Establishments::Longitude).double().null())
                    .col(ColumnDef::new(Establishments::PriceCategory).string_len(20).null())
                    .col(
                        ColumnDef::new(Establishments::RequestStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Establishments::ProfilePicture).string().not_null())
                    .col(ColumnDef::new(Establishments::BackgroundPicture).string().not_null())
                    .col(
                        ColumnDef::new(Establishments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Establishments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Coordinates are stored as a pair or not at all
                    .check(
                        Expr::col(Establishments::Latitude)
                            .is_null()
                            .and(Expr::col(Establishments::Longitude).is_null())
                            .or(Expr::col(Establishments::Latitude)
                                .is_not_null()
                                .and(Expr::col(Establishments::Longitude).is_not_null())),
                    )
                    .to_owned(),
            )
            .await?;

        // Visibility filter and moderation listing
        manager
            .create_index(
                Index::create()
                    .name("idx_establishments_request_status")
                    .table(Establishments::Table)
                    .col(Establishments::RequestStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_establishments_created_at")
                    .table(Establishments::Table)
                    .col(Establishments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EstablishmentCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EstablishmentCategories::EstablishmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EstablishmentCategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EstablishmentCategories::EstablishmentId)
                            .col(EstablishmentCategories::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establishment_categories_establishment")
                            .from(
                                EstablishmentCategories::Table,
                                EstablishmentCategories::EstablishmentId,
                            )
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establishment_categories_category")
                            .from(
                                EstablishmentCategories::Table,
                                EstablishmentCategories::CategoryId,
                            )
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EstablishmentTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EstablishmentTags::EstablishmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EstablishmentTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(EstablishmentTags::EstablishmentId)
                            .col(EstablishmentTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establishment_tags_establishment")
                            .from(EstablishmentTags::Table, EstablishmentTags::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establishment_tags_tag")
                            .from(EstablishmentTags::Table, EstablishmentTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SocialLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SocialLinks::EstablishmentId).integer().not_null())
                    .col(ColumnDef::new(SocialLinks::Platform).string_len(50).not_null())
                    .col(ColumnDef::new(SocialLinks::Url).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_links_establishment")
                            .from(SocialLinks::Table, SocialLinks::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessHours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessHours::EstablishmentId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BusinessHours::Monday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Tuesday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Wednesday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Thursday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Friday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Saturday).string_len(32).null())
                    .col(ColumnDef::new(BusinessHours::Sunday).string_len(32).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_hours_establishment")
                            .from(BusinessHours::Table, BusinessHours::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessHoursExceptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessHoursExceptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessHoursExceptions::BusinessHoursId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BusinessHoursExceptions::Date).date().not_null())
                    .col(ColumnDef::new(BusinessHoursExceptions::Hours).string_len(32).null())
                    .col(ColumnDef::new(BusinessHoursExceptions::Reason).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_hours_exceptions_hours")
                            .from(
                                BusinessHoursExceptions::Table,
                                BusinessHoursExceptions::BusinessHoursId,
                            )
                            .to(BusinessHours::Table, BusinessHours::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RatingStatistics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RatingStatistics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RatingStatistics::EstablishmentId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RatingStatistics::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(RatingStatistics::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_statistics_establishment")
                            .from(RatingStatistics::Table, RatingStatistics::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::RatingStatisticId).integer().not_null())
                    .col(ColumnDef::new(Reviews::UserId).integer().not_null())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().null())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_rating_statistic")
                            .from(Reviews::Table, Reviews::RatingStatisticId)
                            .to(RatingStatistics::Table, RatingStatistics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Reviews::Table.into_iden(),
            RatingStatistics::Table.into_iden(),
            BusinessHoursExceptions::Table.into_iden(),
            BusinessHours::Table.into_iden(),
            SocialLinks::Table.into_iden(),
            EstablishmentTags::Table.into_iden(),
            EstablishmentCategories::Table.into_iden(),
            Establishments::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Establishments {
    Table,
    Id,
    #[iden = "auth0_id"]
    Auth0Id,
    Name,
    Description,
    City,
    Address,
    Latitude,
    Longitude,
    PriceCategory,
    RequestStatus,
    ProfilePicture,
    BackgroundPicture,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum EstablishmentCategories {
    Table,
    EstablishmentId,
    CategoryId,
}

#[derive(Iden)]
enum EstablishmentTags {
    Table,
    EstablishmentId,
    TagId,
}

#[derive(Iden)]
enum SocialLinks {
    Table,
    Id,
    EstablishmentId,
    Platform,
    Url,
}

#[derive(Iden)]
enum BusinessHours {
    Table,
    Id,
    EstablishmentId,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Iden)]
enum BusinessHoursExceptions {
    Table,
    Id,
    BusinessHoursId,
    Date,
    Hours,
    Reason,
}

#[derive(Iden)]
enum RatingStatistics {
    Table,
    Id,
    EstablishmentId,
    AverageRating,
    ReviewCount,
}

#[derive(Iden)]
enum Reviews {
    Table,
    Id,
    RatingStatisticId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
