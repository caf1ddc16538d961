//! Create video_like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoLike::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VideoLike::UserId).integer().not_null())
                    .col(ColumnDef::new(VideoLike::VideoId).integer().not_null())
                    .col(ColumnDef::new(VideoLike::Status).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(VideoLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(VideoLike::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One row per pair; toggles upsert against this key
                    .primary_key(
                        Index::create()
                            .name("pk_video_like")
                            .col(VideoLike::UserId)
                            .col(VideoLike::VideoId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_like_user")
                            .from(VideoLike::Table, VideoLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_like_video")
                            .from(VideoLike::Table, VideoLike::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (video, status) (for counting and listing active rows per target)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_like_video_status")
                    .table(VideoLike::Table)
                    .col(VideoLike::VideoId)
                    .col(VideoLike::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VideoLike {
    Table,
    UserId,
    VideoId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
}
