use sea_orm_migration::sea_orm::entity::prelude::DeriveIden;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RegionCode::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RegionCode::MainCode).string().not_null())
                    .col(ColumnDef::new(RegionCode::SubCode).string().not_null())
                    .col(ColumnDef::new(RegionCode::Name).string().not_null())
                    .col(ColumnDef::new(RegionCode::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(RegionCode::UpdatedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .col(RegionCode::MainCode)
                            .col(RegionCode::SubCode),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegionCode::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum RegionCode {
    #[sea_orm(iden = "RegionCode")]
    Table,
    MainCode,
    SubCode,
    Name,
    CreatedAt,
    UpdatedAt,
}
