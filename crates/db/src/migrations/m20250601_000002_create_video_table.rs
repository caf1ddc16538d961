//! Create video table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Video::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Video::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Video::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Video::PlayUrl).string_len(1024).not_null())
                    .col(ColumnDef::new(Video::CoverUrl).string_len(1024).not_null())
                    .col(ColumnDef::new(Video::Description).text().not_null())
                    .col(ColumnDef::new(Video::VideoType).integer().not_null())
                    .col(
                        ColumnDef::new(Video::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_author")
                            .from(Video::Table, Video::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id (for listing a user's uploads)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_author_id")
                    .table(Video::Table)
                    .col(Video::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: (video_type, id) (for category feeds, newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_type_id")
                    .table(Video::Table)
                    .col(Video::VideoType)
                    .col(Video::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Video::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
    AuthorId,
    PlayUrl,
    CoverUrl,
    Description,
    VideoType,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
