use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Board rendering sorts every container by `position`; these indexes keep
/// the common index queries off sequential scans.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("tasks_user_section_position")
                    .table((Alias::new("daylist"), Alias::new("tasks")))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("section_id"))
                    .col(Alias::new("position"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("tasks_due_by")
                    .table((Alias::new("daylist"), Alias::new("tasks")))
                    .col(Alias::new("due_by"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sections_user_position")
                    .table((Alias::new("daylist"), Alias::new("sections")))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("position"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("folders_user_position")
                    .table((Alias::new("daylist"), Alias::new("folders")))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("position"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "tasks_user_section_position",
            "tasks_due_by",
            "sections_user_position",
            "folders_user_position",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
