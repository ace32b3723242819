//! Initial migration to create the trawler database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_platforms(manager).await?;
        self.create_users(manager).await?;
        self.create_projects(manager).await?;
        self.create_project_users(manager).await?;
        self.create_releases(manager).await?;
        self.create_repositories(manager).await?;
        self.create_repository_snapshots(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RepositorySnapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Releases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Platforms::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_platforms(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Platforms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Platforms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Platforms::Url).string().not_null())
                    .col(ColumnDef::new(Platforms::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Platforms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: one platform row per distinct base url
        manager
            .create_index(
                Index::create()
                    .name("idx_platforms_url")
                    .table(Platforms::Table)
                    .col(Platforms::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .to_owned(),
            )
            .await?;

        // Natural key: usernames are shared globally across sources
        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_projects(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::PlatformId).uuid().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Url).string().not_null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_platform")
                            .from(Projects::Table, Projects::PlatformId)
                            .to(Platforms::Table, Platforms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for both adapter-declared natural keys.
        // Logical uniqueness is enforced by the resolver inside the run
        // transaction; which key applies varies per adapter.
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_platform_name")
                    .table(Projects::Table)
                    .col(Projects::PlatformId)
                    .col(Projects::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_platform_url")
                    .table(Projects::Table)
                    .col(Projects::PlatformId)
                    .col(Projects::Url)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_project_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectUsers::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectUsers::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProjectUsers::ProjectId)
                            .col(ProjectUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_users_project")
                            .from(ProjectUsers::Table, ProjectUsers::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_users_user")
                            .from(ProjectUsers::Table, ProjectUsers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_releases(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Releases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Releases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Releases::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Releases::UserId).uuid().null())
                    .col(ColumnDef::new(Releases::Name).string().not_null())
                    .col(ColumnDef::new(Releases::Version).string().not_null())
                    .col(ColumnDef::new(Releases::Url).text().null())
                    .col(ColumnDef::new(Releases::FileUrl).text().null())
                    .col(
                        ColumnDef::new(Releases::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Releases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_releases_project")
                            .from(Releases::Table, Releases::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_releases_user")
                            .from(Releases::Table, Releases::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup index for the (project, name, version) natural key
        manager
            .create_index(
                Index::create()
                    .name("idx_releases_project_name_version")
                    .table(Releases::Table)
                    .col(Releases::ProjectId)
                    .col(Releases::Name)
                    .col(Releases::Version)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Repositories::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::Url).string().not_null())
                    .col(ColumnDef::new(Repositories::CloneUrl).text().null())
                    .col(ColumnDef::new(Repositories::Kind).string().not_null())
                    .col(ColumnDef::new(Repositories::Starred).big_integer().null())
                    .col(ColumnDef::new(Repositories::Pulls).big_integer().null())
                    .col(
                        ColumnDef::new(Repositories::Downloads)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Repositories::Forks).big_integer().null())
                    .col(ColumnDef::new(Repositories::Watchers).big_integer().null())
                    .col(
                        ColumnDef::new(Repositories::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repositories_project")
                            .from(Repositories::Table, Repositories::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: repository urls are unique across all projects
        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_url")
                    .table(Repositories::Table)
                    .col(Repositories::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_repository_snapshots(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RepositorySnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RepositorySnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::RepositoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::Starred)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::Pulls)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::Downloads)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::Forks)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RepositorySnapshots::Watchers)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_snapshots_repository")
                            .from(
                                RepositorySnapshots::Table,
                                RepositorySnapshots::RepositoryId,
                            )
                            .to(Repositories::Table, Repositories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Time-series reads walk one repository's history in order
        manager
            .create_index(
                Index::create()
                    .name("idx_repository_snapshots_repo_recorded")
                    .table(RepositorySnapshots::Table)
                    .col(RepositorySnapshots::RepositoryId)
                    .col(RepositorySnapshots::RecordedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "platforms")]
enum Platforms {
    Table,
    Id,
    Url,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "users")]
enum Users {
    Table,
    Id,
    Username,
    Email,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "projects")]
enum Projects {
    Table,
    Id,
    PlatformId,
    Name,
    Url,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "project_users")]
enum ProjectUsers {
    Table,
    ProjectId,
    UserId,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "releases")]
enum Releases {
    Table,
    Id,
    ProjectId,
    UserId,
    Name,
    Version,
    Url,
    FileUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repositories")]
enum Repositories {
    Table,
    Id,
    ProjectId,
    Name,
    Url,
    CloneUrl,
    Kind,
    Starred,
    Pulls,
    Downloads,
    Forks,
    Watchers,
    SyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repository_snapshots")]
enum RepositorySnapshots {
    Table,
    Id,
    RepositoryId,
    RecordedAt,
    Starred,
    Pulls,
    Downloads,
    Forks,
    Watchers,
}
