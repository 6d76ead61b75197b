use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum InternshipRegistrations {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    College,
    Domain,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InternshipRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternshipRegistrations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InternshipRegistrations::Name).string().not_null())
                    .col(ColumnDef::new(InternshipRegistrations::Email).string().not_null())
                    .col(
                        ColumnDef::new(InternshipRegistrations::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InternshipRegistrations::College).string().null())
                    .col(ColumnDef::new(InternshipRegistrations::Domain).string().not_null())
                    .col(
                        ColumnDef::new(InternshipRegistrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InternshipRegistrations::Table).to_owned())
            .await?;
        Ok(())
    }
}
