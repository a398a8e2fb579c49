use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Description,
    EventDate,
    Location,
    TotalCards,
    TotalRounds,
    Seed,
    Status,
    CreatedBy,
    StartedAt,
    FinishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    EventId,
    CardIndex,
    QrCode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subcards {
    Table,
    Id,
    CardId,
    EventId,
    RoundNumber,
    GridHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SubcardCells {
    Table,
    Id,
    SubcardId,
    Row,
    Col,
    Value,
    Marked,
    MarkedAt,
}

#[derive(DeriveIden)]
enum Draws {
    Table,
    Id,
    EventId,
    RoundNumber,
    Number,
    DrawOrder,
    DrawnAt,
}

#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    EventId,
    SubcardId,
    CardId,
    RoundNumber,
    PrizeDescription,
    AwardedAt,
}

#[derive(DeriveIden)]
enum BingoClaims {
    Table,
    Id,
    EventId,
    SubcardId,
    ClaimedBy,
    IsValid,
    ValidatedAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("event_status"))
                    .values(vec![
                        Alias::new("draft"),
                        Alias::new("generated"),
                        Alias::new("running"),
                        Alias::new("finished"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(
                        ColumnDef::new(Events::EventDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::Location).string().null())
                    .col(
                        ColumnDef::new(Events::TotalCards)
                            .integer()
                            .not_null()
                            .default(2000),
                    )
                    .col(
                        ColumnDef::new(Events::TotalRounds)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    // Server-only, never serialized to clients.
                    .col(ColumnDef::new(Events::Seed).string().null())
                    .col(
                        ColumnDef::new(Events::Status)
                            .custom(Alias::new("event_status"))
                            .not_null()
                            .default(Expr::cust("'draft'::event_status")),
                    )
                    .col(ColumnDef::new(Events::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Events::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Events::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_status")
                    .table(Events::Table)
                    .col(Events::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cards::EventId).uuid().not_null())
                    .col(ColumnDef::new(Cards::CardIndex).integer().not_null())
                    .col(ColumnDef::new(Cards::QrCode).string().not_null())
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_event")
                            .from(Cards::Table, Cards::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_cards_event_index")
                    .table(Cards::Table)
                    .col(Cards::EventId)
                    .col(Cards::CardIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_cards_qr_code")
                    .table(Cards::Table)
                    .col(Cards::QrCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subcards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subcards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subcards::CardId).uuid().not_null())
                    // Redundant with cards.event_id; keeps draw-path queries off a join.
                    .col(ColumnDef::new(Subcards::EventId).uuid().not_null())
                    .col(
                        ColumnDef::new(Subcards::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subcards::GridHash).string().not_null())
                    .col(
                        ColumnDef::new(Subcards::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subcards_card")
                            .from(Subcards::Table, Subcards::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subcards_event")
                            .from(Subcards::Table, Subcards::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_subcards_card_round")
                    .table(Subcards::Table)
                    .col(Subcards::CardId)
                    .col(Subcards::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_subcards_event_round_hash")
                    .table(Subcards::Table)
                    .col(Subcards::EventId)
                    .col(Subcards::RoundNumber)
                    .col(Subcards::GridHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subcards_event_round")
                    .table(Subcards::Table)
                    .col(Subcards::EventId)
                    .col(Subcards::RoundNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubcardCells::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubcardCells::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubcardCells::SubcardId).uuid().not_null())
                    .col(
                        ColumnDef::new(SubcardCells::Row)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubcardCells::Col)
                            .small_integer()
                            .not_null(),
                    )
                    // "1".."75" or "FREE"
                    .col(ColumnDef::new(SubcardCells::Value).string().not_null())
                    .col(
                        ColumnDef::new(SubcardCells::Marked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubcardCells::MarkedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subcard_cells_subcard")
                            .from(SubcardCells::Table, SubcardCells::SubcardId)
                            .to(Subcards::Table, Subcards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_subcard_cells_position")
                    .table(SubcardCells::Table)
                    .col(SubcardCells::SubcardId)
                    .col(SubcardCells::Row)
                    .col(SubcardCells::Col)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subcard_cells_value")
                    .table(SubcardCells::Table)
                    .col(SubcardCells::Value)
                    .col(SubcardCells::Marked)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Draws::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Draws::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Draws::EventId).uuid().not_null())
                    .col(
                        ColumnDef::new(Draws::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Draws::Number).small_integer().not_null())
                    .col(ColumnDef::new(Draws::DrawOrder).integer().not_null())
                    .col(
                        ColumnDef::new(Draws::DrawnAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draws_event")
                            .from(Draws::Table, Draws::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Event-wide: a number drawn in one round never recurs in another.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_draws_event_number")
                    .table(Draws::Table)
                    .col(Draws::EventId)
                    .col(Draws::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Exactly one number per position in a round's sequence; concurrent
        // draws that compute the same next position collide here.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_draws_event_round_order")
                    .table(Draws::Table)
                    .col(Draws::EventId)
                    .col(Draws::RoundNumber)
                    .col(Draws::DrawOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Winners::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Winners::EventId).uuid().not_null())
                    .col(ColumnDef::new(Winners::SubcardId).uuid().not_null())
                    .col(ColumnDef::new(Winners::CardId).uuid().not_null())
                    .col(
                        ColumnDef::new(Winners::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Winners::PrizeDescription).string().null())
                    .col(
                        ColumnDef::new(Winners::AwardedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_event")
                            .from(Winners::Table, Winners::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_subcard")
                            .from(Winners::Table, Winners::SubcardId)
                            .to(Subcards::Table, Subcards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_card")
                            .from(Winners::Table, Winners::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One winner per round; the constraint is the race arbiter.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_winners_event_round")
                    .table(Winners::Table)
                    .col(Winners::EventId)
                    .col(Winners::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BingoClaims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BingoClaims::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BingoClaims::EventId).uuid().not_null())
                    .col(ColumnDef::new(BingoClaims::SubcardId).uuid().not_null())
                    .col(ColumnDef::new(BingoClaims::ClaimedBy).uuid().null())
                    .col(
                        ColumnDef::new(BingoClaims::IsValid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BingoClaims::ValidatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BingoClaims::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bingo_claims_event")
                            .from(BingoClaims::Table, BingoClaims::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bingo_claims_subcard")
                            .from(BingoClaims::Table, BingoClaims::SubcardId)
                            .to(Subcards::Table, Subcards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_bingo_claims_subcard")
                    .table(BingoClaims::Table)
                    .col(BingoClaims::SubcardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bingo_claims_event")
                    .table(BingoClaims::Table)
                    .col(BingoClaims::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BingoClaims::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Draws::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubcardCells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subcards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("event_status")).to_owned())
            .await?;
        Ok(())
    }
}
