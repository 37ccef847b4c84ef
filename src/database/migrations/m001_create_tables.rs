use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("VIEWER"))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::LastLoginAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::Name).string().not_null())
                    .col(ColumnDef::new(Properties::City).string().null())
                    .col(ColumnDef::new(Properties::Country).string().null())
                    .col(ColumnDef::new(Properties::Address).string().null())
                    .col(ColumnDef::new(Properties::PropertyType).string().not_null().default("hotel"))
                    .col(ColumnDef::new(Properties::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Properties::Timezone).string().not_null().default("UTC"))
                    .col(ColumnDef::new(Properties::DefaultFrequencyCron).string().not_null().default("0 */2 * * *"))
                    .col(ColumnDef::new(Properties::DefaultLookaheadDays).integer().not_null().default(30))
                    .col(ColumnDef::new(Properties::BrandingLogoUrl).string().null())
                    .col(ColumnDef::new(Properties::BrandingPrimaryColor).string().null())
                    .col(ColumnDef::new(Properties::BrandingAccentColor).string().null())
                    .col(ColumnDef::new(Properties::Theme).string().null())
                    .col(ColumnDef::new(Properties::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Properties::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_owner_id")
                            .from(Properties::Table, Properties::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create room_types table
        manager
            .create_table(
                Table::create()
                    .table(RoomTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoomTypes::PropertyId).integer().not_null())
                    .col(ColumnDef::new(RoomTypes::Name).string().not_null())
                    .col(ColumnDef::new(RoomTypes::Code).string().null())
                    .col(ColumnDef::new(RoomTypes::Capacity).integer().not_null().default(2))
                    .col(ColumnDef::new(RoomTypes::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(RoomTypes::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(RoomTypes::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_types_property_id")
                            .from(RoomTypes::Table, RoomTypes::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create competitors table
        manager
            .create_table(
                Table::create()
                    .table(Competitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Competitors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Competitors::PropertyId).integer().not_null())
                    .col(ColumnDef::new(Competitors::Name).string().not_null())
                    .col(ColumnDef::new(Competitors::BaseUrl).string().not_null())
                    .col(ColumnDef::new(Competitors::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Competitors::FrequencyCron).string().null())
                    .col(ColumnDef::new(Competitors::Timezone).string().null())
                    .col(ColumnDef::new(Competitors::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Competitors::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competitors_property_id")
                            .from(Competitors::Table, Competitors::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create competitor_configs table
        manager
            .create_table(
                Table::create()
                    .table(CompetitorConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompetitorConfigs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompetitorConfigs::CompetitorId).integer().not_null())
                    .col(ColumnDef::new(CompetitorConfigs::RoomTypeId).integer().not_null())
                    .col(ColumnDef::new(CompetitorConfigs::PriceSelector).string().null())
                    .col(ColumnDef::new(CompetitorConfigs::DateSelector).string().null())
                    .col(ColumnDef::new(CompetitorConfigs::CurrencySelector).string().null())
                    .col(ColumnDef::new(CompetitorConfigs::AvailabilitySelector).string().null())
                    .col(ColumnDef::new(CompetitorConfigs::Notes).string().null())
                    .col(ColumnDef::new(CompetitorConfigs::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CompetitorConfigs::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competitor_configs_competitor_id")
                            .from(CompetitorConfigs::Table, CompetitorConfigs::CompetitorId)
                            .to(Competitors::Table, Competitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competitor_configs_room_type_id")
                            .from(CompetitorConfigs::Table, CompetitorConfigs::RoomTypeId)
                            .to(RoomTypes::Table, RoomTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_competitor_configs_competitor_room_type")
                    .table(CompetitorConfigs::Table)
                    .col(CompetitorConfigs::CompetitorId)
                    .col(CompetitorConfigs::RoomTypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create price_records table
        manager
            .create_table(
                Table::create()
                    .table(PriceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PriceRecords::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PriceRecords::CompetitorId).integer().not_null())
                    .col(ColumnDef::new(PriceRecords::RoomTypeId).integer().not_null())
                    .col(ColumnDef::new(PriceRecords::TargetDate).date().not_null())
                    .col(ColumnDef::new(PriceRecords::Price).double().not_null())
                    .col(ColumnDef::new(PriceRecords::Currency).string().not_null().default("EUR"))
                    .col(ColumnDef::new(PriceRecords::Available).boolean().not_null().default(true))
                    .col(ColumnDef::new(PriceRecords::FetchedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PriceRecords::Source).string().not_null().default("webhook"))
                    .col(ColumnDef::new(PriceRecords::Metadata).json_binary().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_records_property_id")
                            .from(PriceRecords::Table, PriceRecords::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_records_competitor_id")
                            .from(PriceRecords::Table, PriceRecords::CompetitorId)
                            .to(Competitors::Table, Competitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_records_room_type_id")
                            .from(PriceRecords::Table, PriceRecords::RoomTypeId)
                            .to(RoomTypes::Table, RoomTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // re-scrapes of the same tuple are skipped, not merged
        manager
            .create_index(
                Index::create()
                    .name("idx_price_records_dedup")
                    .table(PriceRecords::Table)
                    .col(PriceRecords::PropertyId)
                    .col(PriceRecords::CompetitorId)
                    .col(PriceRecords::RoomTypeId)
                    .col(PriceRecords::TargetDate)
                    .col(PriceRecords::Source)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_price_records_property_target_date")
                    .table(PriceRecords::Table)
                    .col(PriceRecords::PropertyId)
                    .col(PriceRecords::TargetDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_price_records_property_fetched_at")
                    .table(PriceRecords::Table)
                    .col(PriceRecords::PropertyId)
                    .col(PriceRecords::FetchedAt)
                    .to_owned(),
            )
            .await?;

        // Create property_access_grants table
        manager
            .create_table(
                Table::create()
                    .table(PropertyAccessGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyAccessGrants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyAccessGrants::UserId).integer().not_null())
                    .col(ColumnDef::new(PropertyAccessGrants::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PropertyAccessGrants::Level).string().not_null().default("VIEWER"))
                    .col(ColumnDef::new(PropertyAccessGrants::GrantedBy).integer().null())
                    .col(ColumnDef::new(PropertyAccessGrants::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PropertyAccessGrants::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_access_grants_user_id")
                            .from(PropertyAccessGrants::Table, PropertyAccessGrants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_access_grants_property_id")
                            .from(PropertyAccessGrants::Table, PropertyAccessGrants::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_access_grants_granted_by")
                            .from(PropertyAccessGrants::Table, PropertyAccessGrants::GrantedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // one grant per (user, property); re-granting upserts the level
        manager
            .create_index(
                Index::create()
                    .name("idx_property_access_grants_user_property")
                    .table(PropertyAccessGrants::Table)
                    .col(PropertyAccessGrants::UserId)
                    .col(PropertyAccessGrants::PropertyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create scrape_events table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeEvents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeEvents::PropertyId).integer().not_null())
                    .col(ColumnDef::new(ScrapeEvents::CompetitorId).integer().null())
                    .col(ColumnDef::new(ScrapeEvents::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeEvents::Message).string().null())
                    .col(ColumnDef::new(ScrapeEvents::Payload).json_binary().null())
                    .col(ColumnDef::new(ScrapeEvents::Source).string().null())
                    .col(ColumnDef::new(ScrapeEvents::ReceivedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrape_events_property_id")
                            .from(ScrapeEvents::Table, ScrapeEvents::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scrape_events_competitor_id")
                            .from(ScrapeEvents::Table, ScrapeEvents::CompetitorId)
                            .to(Competitors::Table, Competitors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_events_property_received_at")
                    .table(ScrapeEvents::Table)
                    .col(ScrapeEvents::PropertyId)
                    .col(ScrapeEvents::ReceivedAt)
                    .to_owned(),
            )
            .await?;

        // Create audit_logs table
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::UserId).integer().not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::TargetType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::TargetId).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Metadata).json_binary().null())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_user_id")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScrapeEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyAccessGrants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PriceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompetitorConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competitors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
    LastLoginAt,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    City,
    Country,
    Address,
    PropertyType,
    OwnerId,
    Timezone,
    DefaultFrequencyCron,
    DefaultLookaheadDays,
    BrandingLogoUrl,
    BrandingPrimaryColor,
    BrandingAccentColor,
    Theme,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RoomTypes {
    Table,
    Id,
    PropertyId,
    Name,
    Code,
    Capacity,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Competitors {
    Table,
    Id,
    PropertyId,
    Name,
    BaseUrl,
    Active,
    FrequencyCron,
    Timezone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CompetitorConfigs {
    Table,
    Id,
    CompetitorId,
    RoomTypeId,
    PriceSelector,
    DateSelector,
    CurrencySelector,
    AvailabilitySelector,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PriceRecords {
    Table,
    Id,
    PropertyId,
    CompetitorId,
    RoomTypeId,
    TargetDate,
    Price,
    Currency,
    Available,
    FetchedAt,
    Source,
    Metadata,
}

#[derive(DeriveIden)]
enum PropertyAccessGrants {
    Table,
    Id,
    UserId,
    PropertyId,
    Level,
    GrantedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScrapeEvents {
    Table,
    Id,
    PropertyId,
    CompetitorId,
    Status,
    Message,
    Payload,
    Source,
    ReceivedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    TargetType,
    TargetId,
    Metadata,
    CreatedAt,
}
